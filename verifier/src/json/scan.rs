//! Targeted field lookup among the top-level members of a JSON object.

use super::{TokenKind, TokenReader};
use crate::{Error, Result};

/// Finds the first string value of every name in `names`.
///
/// The reader must be positioned before the document's opening `{`. Members
/// whose name is not wanted (or already satisfied) are skipped together with
/// any nested value, so only top-level members can match. Scanning stops as
/// soon as every name is satisfied; whatever follows is never read.
///
/// Returned slices are the raw string contents, quotes excluded.
pub fn find_fields<'a, R, const N: usize>(
    reader: &mut R,
    names: [&'static str; N],
) -> Result<[&'a [u8]; N]>
where
    R: TokenReader<'a>,
{
    let mut found: [Option<&'a [u8]>; N] = [None; N];

    let first_missing = |found: &[Option<&'a [u8]>; N]| -> Error {
        let name = names
            .iter()
            .zip(found.iter())
            .find(|(_, slot)| slot.is_none())
            .map(|(name, _)| *name)
            .unwrap_or("");
        log::warn!("[JWS] json field `{name}` not found");
        Error::FieldNotFound(name)
    };

    if reader.next_token().is_err() || reader.token_kind() != TokenKind::BeginObject {
        return Err(first_missing(&found));
    }

    while found.iter().any(Option::is_none) {
        if reader.next_token().is_err() || reader.token_kind() != TokenKind::PropertyName {
            // Object closed, document ended, or malformed input.
            return Err(first_missing(&found));
        }

        let wanted = names
            .iter()
            .zip(found.iter())
            .position(|(name, slot)| slot.is_none() && reader.token_is_text_equal(name.as_bytes()));

        if reader.next_token().is_err() {
            return Err(first_missing(&found));
        }

        match wanted {
            Some(idx) if reader.token_kind() == TokenKind::String => {
                found[idx] = Some(reader.token_slice());
            }
            Some(idx) => {
                log::warn!("[JWS] json field `{}` is not a string", names[idx]);
                return Err(Error::FieldNotFound(names[idx]));
            }
            None => {
                if reader.skip_children().is_err() {
                    return Err(first_missing(&found));
                }
            }
        }
    }

    Ok(found.map(|slot| slot.unwrap_or(&[])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonReader;

    fn scan<'a, const N: usize>(doc: &'a [u8], names: [&'static str; N]) -> Result<[&'a [u8]; N]> {
        find_fields(&mut JsonReader::new(doc), names)
    }

    #[test]
    fn finds_single_field() {
        let [sjwk] = scan(br#"{"alg":"RS256","sjwk":"a.b.c"}"#, ["sjwk"]).unwrap();
        assert_eq!(sjwk, b"a.b.c");
    }

    #[test]
    fn finds_fields_in_any_order() {
        let doc = br#"{"kty":"RSA","e":"AQAB","alg":"RS256","n":"xyz","kid":"k"}"#;
        let [n, e, alg] = scan(doc, ["n", "e", "alg"]).unwrap();
        assert_eq!(n, b"xyz");
        assert_eq!(e, b"AQAB");
        assert_eq!(alg, b"RS256");
    }

    #[test]
    fn nested_members_never_match() {
        let doc = br#"{"hashes":{"sha256":"nested"},"list":[{"sha256":"deep"}],"sha256":"top"}"#;
        let [sha] = scan(doc, ["sha256"]).unwrap();
        assert_eq!(sha, b"top");
    }

    #[test]
    fn first_occurrence_wins() {
        let [kid] = scan(br#"{"kid":"first","kid":"second"}"#, ["kid"]).unwrap();
        assert_eq!(kid, b"first");
    }

    #[test]
    fn stops_once_satisfied() {
        let [kid] = scan(br#"{"kid":"ADU.200702.R", this is not json"#, ["kid"]).unwrap();
        assert_eq!(kid, b"ADU.200702.R");
    }

    #[test]
    fn reports_first_missing_name() {
        let err = scan(br#"{"n":"xyz","alg":"RS256"}"#, ["n", "e", "alg"]).unwrap_err();
        assert_eq!(err, Error::FieldNotFound("e"));
    }

    #[test]
    fn non_string_value_is_not_a_match() {
        let err = scan(br#"{"sha256":{"value":"x"}}"#, ["sha256"]).unwrap_err();
        assert_eq!(err, Error::FieldNotFound("sha256"));
    }

    #[test]
    fn malformed_or_non_object_input_reports_missing() {
        let docs: [&[u8]; 5] = [b"", b"[]", b"\"sha256\"", br#"{"sha256":abc}"#, br#"{"other":1,"#];
        for doc in docs {
            assert_eq!(scan(doc, ["sha256"]).unwrap_err(), Error::FieldNotFound("sha256"));
        }
    }

    #[test]
    fn matching_is_case_sensitive() {
        let err = scan(br#"{"KID":"x"}"#, ["kid"]).unwrap_err();
        assert_eq!(err, Error::FieldNotFound("kid"));
    }
}
