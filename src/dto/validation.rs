//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::dao::models::ReleaseYear;

/// Largest release year accepted on writes.
const MAX_RELEASE_YEAR: i32 = 9999;

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Every genre tag must be non-blank and contain no comma, since filters split on commas.
pub fn validate_genres(genres: &[String]) -> Result<(), ValidationError> {
    for genre in genres {
        if genre.trim().is_empty() {
            let mut err = ValidationError::new("genre_blank");
            err.message = Some("genres must not contain blank entries".into());
            return Err(err);
        }
        if genre.contains(',') {
            let mut err = ValidationError::new("genre_comma");
            err.message = Some(format!("genre `{genre}` must not contain a comma").into());
            return Err(err);
        }
    }
    Ok(())
}

/// Numeric years must fall in `0..=9999`; textual years must not be blank.
///
/// Conversion to the configured canonical type happens later, in the service layer.
pub fn validate_release_year(year: &ReleaseYear) -> Result<(), ValidationError> {
    match year {
        ReleaseYear::Number(value) if !(0..=MAX_RELEASE_YEAR).contains(value) => {
            let mut err = ValidationError::new("release_year_range");
            err.message = Some(
                format!("release_year must be between 0 and {MAX_RELEASE_YEAR} (got {value})")
                    .into(),
            );
            Err(err)
        }
        ReleaseYear::Text(text) => validate_not_blank(text),
        ReleaseYear::Number(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Hades").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_validate_genres() {
        assert!(validate_genres(&[]).is_ok());
        assert!(validate_genres(&["action".into(), "rpg".into()]).is_ok());
        assert!(validate_genres(&["action".into(), " ".into()]).is_err());
        assert!(validate_genres(&["action,rpg".into()]).is_err());
    }

    #[test]
    fn test_validate_release_year() {
        assert!(validate_release_year(&ReleaseYear::Number(1998)).is_ok());
        assert!(validate_release_year(&ReleaseYear::Text("1998".into())).is_ok());
        assert!(validate_release_year(&ReleaseYear::Number(-1)).is_err());
        assert!(validate_release_year(&ReleaseYear::Number(10_000)).is_err());
        assert!(validate_release_year(&ReleaseYear::Text("".into())).is_err());
    }
}
