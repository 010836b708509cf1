use lazy_static::lazy_static;
use regex::Regex;

// Validate an EVM address (0x followed by 40 hex digits)
pub fn validate_evm_address(address: &str) -> bool {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
    }

    RE.is_match(address.trim())
}

// Keep the first `head` and last `tail` characters of `text`
pub fn shorten(text: &str, head: usize, tail: usize) -> String {
    let count = text.chars().count();
    if count <= head + tail {
        return text.to_string();
    }

    let start: String = text.chars().take(head).collect();
    let end: String = text.chars().skip(count - tail).collect();
    format!("{}...{}", start, end)
}

// Shorten address for display
pub fn shorten_address(address: &str) -> String {
    shorten(address, 6, 4)
}
