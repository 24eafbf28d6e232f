use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Typed JSON piped on stdin. `None` when stdin is a terminal or carries only whitespace.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut piped = String::new();
    io::stdin().read_to_string(&mut piped)?;
    parse_piped(&piped)
}

fn parse_piped<T: DeserializeOwned>(piped: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match piped.trim() {
        "" => Ok(None),
        body => Ok(Some(serde_json::from_str(body)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_emi_core::LoanParameters;

    #[test]
    fn test_blank_pipe_means_no_input() {
        assert!(parse_piped::<LoanParameters>(" \n\t").unwrap().is_none());
    }

    #[test]
    fn test_piped_loan_parameters() {
        let params: LoanParameters =
            parse_piped(r#"{"loan_amount": 100000, "interest_rate": 5, "loan_term": 12}"#)
                .unwrap()
                .unwrap();
        assert_eq!(params, LoanParameters::new(100_000.0, 5.0, 12));
    }

    #[test]
    fn test_malformed_pipe_is_an_error() {
        assert!(parse_piped::<LoanParameters>("{\"principal\": ").is_err());
    }
}
