//! The 1/2/3/4-value side-expansion rule shared by `margin`, `padding`, and
//! `border-{width,style,color}`.

use crate::scan::split_top_level_commas;

pub const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// Split a whitespace-separated value into 1-4 side values and expand them
/// into `(side, value)` pairs for `top`/`right`/`bottom`/`left`. Any other
/// token count expands to nothing (§4.4: "other counts expand to empty").
pub fn expand_sides(value: &str) -> Vec<(&'static str, String)> {
    let tokens = split_top_level_whitespace(value);
    let values: [String; 4] = match tokens.len() {
        1 => {
            let v = tokens[0].to_string();
            [v.clone(), v.clone(), v.clone(), v]
        }
        2 => {
            let (v, h) = (tokens[0].to_string(), tokens[1].to_string());
            [v.clone(), h.clone(), v, h]
        }
        3 => {
            let (t, h, b) = (tokens[0].to_string(), tokens[1].to_string(), tokens[2].to_string());
            [t, h.clone(), b, h]
        }
        4 => [
            tokens[0].to_string(),
            tokens[1].to_string(),
            tokens[2].to_string(),
            tokens[3].to_string(),
        ],
        _ => return Vec::new(),
    };
    SIDES.iter().copied().zip(values).collect()
}

/// Inverse of [`expand_sides`]: collapse four side values into their minimal
/// 1/2/3/4-value form, choosing the form by equality among sides.
pub fn contract_sides(top: &str, right: &str, bottom: &str, left: &str) -> String {
    if top == right && right == bottom && bottom == left {
        top.to_string()
    } else if top == bottom && left == right {
        format!("{top} {right}")
    } else if left == right {
        format!("{top} {right} {bottom}")
    } else {
        format!("{top} {right} {bottom} {left}")
    }
}

/// Split on ASCII whitespace at paren-depth 0, so `rgba(0, 0, 0, .5)` and
/// similar function values survive as one token.
pub fn split_top_level_whitespace(value: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let bytes = value.as_bytes();
    let mut depth = 0i32;
    let mut start: Option<usize> = None;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ => {}
        }
        let is_space = depth == 0 && matches!(b, b' ' | b'\t' | b'\n' | b'\r');
        match (is_space, start) {
            (true, Some(s)) => {
                tokens.push(&value[s..i]);
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push(&value[s..]);
    }
    tokens
}

/// Split a comma-joined layered value (e.g. a multi-layer `background`) into
/// its per-layer substrings, trimmed.
pub fn split_layers(value: &str) -> Vec<&str> {
    split_top_level_commas(value).into_iter().map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_one_value() {
        let sides = expand_sides("10px");
        assert_eq!(sides, vec![("top", "10px".into()), ("right", "10px".into()), ("bottom", "10px".into()), ("left", "10px".into())]);
    }

    #[test]
    fn expands_three_values() {
        let sides = expand_sides("10px 20px 30px");
        assert_eq!(
            sides,
            vec![
                ("top", "10px".into()),
                ("right", "20px".into()),
                ("bottom", "30px".into()),
                ("left", "20px".into()),
            ]
        );
    }

    #[test]
    fn other_counts_expand_empty() {
        assert!(expand_sides("10px 20px 30px 40px 50px").is_empty());
        assert!(expand_sides("").is_empty());
    }

    #[test]
    fn contracts_to_single_value() {
        assert_eq!(contract_sides("10px", "10px", "10px", "10px"), "10px");
    }

    #[test]
    fn contracts_to_two_values() {
        assert_eq!(contract_sides("10px", "20px", "10px", "20px"), "10px 20px");
    }

    #[test]
    fn contracts_to_three_values() {
        assert_eq!(contract_sides("10px", "20px", "30px", "20px"), "10px 20px 30px");
    }

    #[test]
    fn contracts_to_four_values() {
        assert_eq!(contract_sides("1px", "2px", "3px", "4px"), "1px 2px 3px 4px");
    }
}
