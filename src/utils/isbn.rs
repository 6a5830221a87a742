//! ISBN cleanup and checksum validation

/// Normalize ISBN by removing hyphens, spaces and any other decoration
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'x' || *c == 'X')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Check the ISBN-10 or ISBN-13 checksum of a normalized ISBN
pub fn validate_isbn(isbn: &str) -> bool {
    let chars: Vec<char> = isbn.chars().collect();
    match chars.len() {
        10 => {
            let mut sum = 0;
            for (i, c) in chars.iter().enumerate() {
                let value = match (c, i) {
                    ('X', 9) => 10,
                    (c, _) => match c.to_digit(10) {
                        Some(d) => d,
                        None => return false,
                    },
                };
                sum += value * (10 - i as u32);
            }
            sum % 11 == 0
        }
        13 => {
            let mut sum = 0;
            for (i, c) in chars.iter().enumerate() {
                let Some(d) = c.to_digit(10) else {
                    return false;
                };
                sum += if i % 2 == 0 { d } else { d * 3 };
            }
            sum % 10 == 0
        }
        _ => false,
    }
}

/// Normalize and validate in one step
pub fn clean_isbn(raw: &str) -> Option<String> {
    let isbn = normalize_isbn(raw);
    validate_isbn(&isbn).then_some(isbn)
}
