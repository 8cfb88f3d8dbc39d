use crate::error::AppError;

/// Convert a "True"/"False" string to a bool. Only the capitalised and
/// lowercase spellings are accepted.
pub(crate) fn str_to_bool(s: &str) -> Result<bool, AppError> {
    match s {
        "True" | "true" => Ok(true),
        "False" | "false" => Ok(false),
        _ => Err(AppError::InvalidBool {
            input: s.to_string(),
        }),
    }
}

/// Split `NAME[:LABEL]=VALUE` into its parts
pub(crate) fn parse_assignment(s: &str) -> Result<(String, Option<String>, String), AppError> {
    let invalid = || AppError::InvalidAssignment {
        input: s.to_string(),
    };
    let (key, value) = s.split_once('=').ok_or_else(invalid)?;
    let (name, label) = match key.split_once(':') {
        Some((name, label)) => (name, Some(label.to_string())),
        None => (key, None),
    };
    if name.is_empty() {
        return Err(invalid());
    }
    Ok((name.to_string(), label, value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_to_bool_accepts_exact_spellings() {
        assert!(str_to_bool("True").unwrap());
        assert!(str_to_bool("true").unwrap());
        assert!(!str_to_bool("False").unwrap());
        assert!(!str_to_bool("false").unwrap());
    }

    #[test]
    fn test_str_to_bool_rejects_everything_else() {
        for input in ["TRUE", "FALSE", "1", "0", "yes", "", " true", "tRue"] {
            assert!(
                matches!(str_to_bool(input), Err(AppError::InvalidBool { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("DEM=/data/dem.tif").unwrap(),
            ("DEM".to_string(), None, "/data/dem.tif".to_string())
        );
        assert_eq!(
            parse_assignment("DEM:Elevation model=a=b").unwrap(),
            (
                "DEM".to_string(),
                Some("Elevation model".to_string()),
                "a=b".to_string()
            )
        );
        assert_eq!(
            parse_assignment("Empty=").unwrap(),
            ("Empty".to_string(), None, String::new())
        );
    }

    #[test]
    fn test_parse_assignment_invalid() {
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=value").is_err());
        assert!(parse_assignment(":label=value").is_err());
    }
}
