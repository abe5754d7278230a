//! Resolves scrambled stream signatures through an external solver.

use crate::error::{Result, SolverError, StreamError};

use super::{FormatValue, Manifest, RawManifestEntry};

/// Turns a scrambled token into the plaintext signature using the platform script.
///
/// Implementations locate the transform in `js` and apply it to `token`.
pub trait SignatureSolver {
    fn solve(&self, js: &str, token: &str) -> std::result::Result<String, SolverError>;
}

impl<F> SignatureSolver for F
where
    F: Fn(&str, &str) -> std::result::Result<String, SolverError>,
{
    fn solve(&self, js: &str, token: &str) -> std::result::Result<String, SolverError> {
        self(js, token)
    }
}

/// True if `url` already carries a resolved `signature` query parameter.
pub fn is_signed(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.query_pairs().any(|(k, _)| k == "signature"),
        Err(_) => url.contains("signature="),
    }
}

/// Returns a copy of `manifest` where every unsigned url of family `key` has
/// `&signature=<value>` appended. Pre-signed entries are copied unchanged.
pub fn apply_signature(
    manifest: &Manifest,
    key: &str,
    js: &str,
    solver: &dyn SignatureSolver,
) -> Result<Manifest> {
    let signed = manifest
        .entries(key)?
        .iter()
        .map(|entry| sign_entry(entry, js, solver))
        .collect::<Result<Vec<_>>>()?;

    let mut out = manifest.clone();
    out.formats
        .insert(key.to_string(), FormatValue::Descrambled(signed));
    Ok(out)
}

fn sign_entry(
    entry: &RawManifestEntry,
    js: &str,
    solver: &dyn SignatureSolver,
) -> Result<RawManifestEntry> {
    let url = entry.get("url").ok_or(StreamError::MissingField("url"))?;
    if is_signed(url) {
        // Some streams are served pre-signed.
        return Ok(entry.clone());
    }

    let itag = entry.get("itag").unwrap_or("?");
    let token = entry.get("s").ok_or_else(|| StreamError::Signature {
        itag: itag.to_string(),
        source: SolverError::MissingToken,
    })?;
    let signature = solver
        .solve(js, token)
        .map_err(|source| StreamError::Signature {
            itag: itag.to_string(),
            source,
        })?;
    tracing::debug!(itag, s = token, signature = %signature, "finished descrambling signature");

    let mut out = entry.clone();
    out.insert("url", format!("{url}&signature={signature}"));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ADAPTIVE_FORMATS;
    use std::cell::Cell;

    fn reverse(_js: &str, token: &str) -> std::result::Result<String, SolverError> {
        Ok(token.chars().rev().collect())
    }

    fn manifest(entries: Vec<RawManifestEntry>) -> Manifest {
        let mut m = Manifest::default();
        m.formats
            .insert(ADAPTIVE_FORMATS.to_string(), FormatValue::Descrambled(entries));
        m
    }

    fn entry(pairs: &[(&str, &str)]) -> RawManifestEntry {
        pairs.iter().copied().collect()
    }

    #[test]
    fn appends_solved_signature() {
        let m = manifest(vec![entry(&[
            ("itag", "140"),
            ("url", "https://host/videoplayback?id=1"),
            ("s", "cba"),
        ])]);
        let out = apply_signature(&m, ADAPTIVE_FORMATS, "", &reverse).unwrap();
        assert_eq!(
            out.entries(ADAPTIVE_FORMATS).unwrap()[0].get("url"),
            Some("https://host/videoplayback?id=1&signature=abc")
        );
        // input untouched
        assert_eq!(
            m.entries(ADAPTIVE_FORMATS).unwrap()[0].get("url"),
            Some("https://host/videoplayback?id=1")
        );
    }

    #[test]
    fn signing_twice_is_idempotent() {
        let m = manifest(vec![entry(&[
            ("itag", "140"),
            ("url", "https://host/videoplayback?id=1"),
            ("s", "cba"),
        ])]);
        let once = apply_signature(&m, ADAPTIVE_FORMATS, "", &reverse).unwrap();
        let twice = apply_signature(&once, ADAPTIVE_FORMATS, "", &reverse).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn presigned_entries_skip_the_solver() {
        let calls = Cell::new(0);
        let counting = |_: &str, t: &str| -> std::result::Result<String, SolverError> {
            calls.set(calls.get() + 1);
            Ok(t.to_string())
        };
        let m = manifest(vec![
            entry(&[("itag", "18"), ("url", "https://host/v?signature=xyz")]),
            entry(&[("itag", "22"), ("url", "u2&signature=pre")]),
        ]);
        let out = apply_signature(&m, ADAPTIVE_FORMATS, "", &counting).unwrap();
        assert_eq!(calls.get(), 0);
        assert_eq!(out, m);
    }

    #[test]
    fn preserves_entry_order() {
        let m = manifest(vec![
            entry(&[("itag", "1"), ("url", "https://h/a?x=1"), ("s", "1")]),
            entry(&[("itag", "2"), ("url", "https://h/b?x=1&signature=ok")]),
            entry(&[("itag", "3"), ("url", "https://h/c?x=1"), ("s", "3")]),
        ]);
        let out = apply_signature(&m, ADAPTIVE_FORMATS, "", &reverse).unwrap();
        let itags: Vec<_> = out
            .entries(ADAPTIVE_FORMATS)
            .unwrap()
            .iter()
            .map(|e| e.get("itag").unwrap().to_string())
            .collect();
        assert_eq!(itags, ["1", "2", "3"]);
    }

    #[test]
    fn solver_failure_identifies_itag() {
        let failing = |_: &str, _: &str| -> std::result::Result<String, SolverError> {
            Err(SolverError::TransformNotFound("decipher".into()))
        };
        let m = manifest(vec![
            entry(&[("itag", "18"), ("url", "https://h/v?signature=ok")]),
            entry(&[("itag", "251"), ("url", "https://h/a?x=1"), ("s", "tok")]),
        ]);
        let err = apply_signature(&m, ADAPTIVE_FORMATS, "", &failing).unwrap_err();
        match err {
            StreamError::Signature { itag, source } => {
                assert_eq!(itag, "251");
                assert!(matches!(source, SolverError::TransformNotFound(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_token_is_a_signature_error() {
        let m = manifest(vec![entry(&[("itag", "251"), ("url", "https://h/a?x=1")])]);
        let err = apply_signature(&m, ADAPTIVE_FORMATS, "", &reverse).unwrap_err();
        assert!(matches!(
            err,
            StreamError::Signature { source: SolverError::MissingToken, .. }
        ));
    }

    #[test]
    fn encoded_family_is_rejected() {
        let mut m = Manifest::default();
        m.formats.insert(
            ADAPTIVE_FORMATS.to_string(),
            FormatValue::Encoded("itag=1".into()),
        );
        let err = apply_signature(&m, ADAPTIVE_FORMATS, "", &reverse).unwrap_err();
        assert!(matches!(err, StreamError::NotDescrambled(_)));
    }

    #[test]
    fn is_signed_handles_relative_and_absolute_urls() {
        assert!(is_signed("https://h/v?a=1&signature=x"));
        assert!(!is_signed("https://h/v?a=1&lsig=x"));
        assert!(is_signed("u1&signature=x"));
        assert!(!is_signed("u1"));
    }
}
