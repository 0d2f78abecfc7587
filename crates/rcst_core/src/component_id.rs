use rand::Rng;

pub const ID_PREFIX: &str = "mazeComponent_";
pub const ID_TOKEN_BYTES: usize = 4;

/// A fresh `mazeComponent_<8 hex>` id. Uniqueness rests on 32 bits of
/// entropy from the thread-local CSPRNG; existing ids are not consulted.
pub fn generate_id() -> String {
    let mut token = [0u8; ID_TOKEN_BYTES];
    rand::rng().fill(&mut token);
    format!("{ID_PREFIX}{}", hex::encode(token))
}

pub fn is_component_id(value: &str) -> bool {
    value.strip_prefix(ID_PREFIX).is_some_and(|token| {
        token.len() == ID_TOKEN_BYTES * 2
            && token.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    })
}
