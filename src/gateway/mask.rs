pub struct Masked;

pub trait MaskPolicy {
    fn mask(value: &str) -> String;
}

impl MaskPolicy for Masked {
    fn mask(value: &str) -> String {
        let chars: Vec<char> = value.chars().collect();
        let len = chars.len();
        if len > 4 {
            "*".repeat(len - 4) + &chars[len - 4..].iter().collect::<String>()
        } else {
            "*".repeat(len)
        }
    }
}

/// Keeps the first character of the local part and the domain.
struct EmailMasked;

impl MaskPolicy for EmailMasked {
    fn mask(value: &str) -> String {
        match value.split_once('@') {
            Some((local, domain)) => {
                let first = local.chars().next().map(String::from).unwrap_or_default();
                format!("{first}***@{domain}")
            }
            None => Masked::mask(value),
        }
    }
}

/// Return true if a key name likely holds a card number fragment.
fn is_card_key(key: &str) -> bool {
    let k = key.to_lowercase();
    k == "pan" || k == "bin" || k.contains("card_number") || k.contains("cardnumber")
}

/// Return true if a key name likely holds a credential.
fn is_credential_key(key: &str) -> bool {
    let k = key.to_lowercase();
    k.contains("authorization_code")
        || k.contains("signature")
        || k.contains("secret")
        || k.contains("token")
        || k == "authorization"
        || k == "cvv"
}

fn is_email_key(key: &str) -> bool {
    key.eq_ignore_ascii_case("email")
}

pub fn secure_value(v: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match v {
        Value::Object(map) => {
            let mut new = serde_json::Map::with_capacity(map.len());
            for (k, val) in map {
                let new_val = match val {
                    // `authorization` is an object on Paystack transactions, recurse into it
                    Value::String(_) | Value::Number(_) if is_credential_key(k) => {
                        Value::String("***".to_string())
                    }
                    Value::String(s) if is_card_key(k) => Value::String(Masked::mask(s)),
                    Value::Number(n) if is_card_key(k) => {
                        Value::String(Masked::mask(&n.to_string()))
                    }
                    Value::String(s) if is_email_key(k) => Value::String(EmailMasked::mask(s)),
                    _ => secure_value(val),
                };
                new.insert(k.clone(), new_val);
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(secure_value).collect()),
        other => other.clone(),
    }
}
