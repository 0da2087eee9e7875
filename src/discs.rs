//! `discs.json` generation for Jukebox Extended Reborn.
//!
//! The template is a JSON array of disc definitions; only the first disc is
//! rewritten for the current episode.
use crate::error::PackError;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Most lore lines the mod renders under a disc tooltip.
pub const MAX_LORES: usize = 2;

/// Load the disc template and overlay the episode fields onto element 0.
///
/// `lores` replaces the template's lores only when non-empty, so custom lore
/// can live in the template itself.
pub fn build_discs(
    template_path: &Path,
    title: &str,
    author: &str,
    duration: u64,
    lores: &[String],
) -> Result<Value, PackError> {
    if lores.len() > MAX_LORES {
        return Err(PackError::TooManyLores { count: lores.len() });
    }

    let bytes = match fs::read(template_path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(PackError::TemplateMissing {
                path: template_path.to_path_buf(),
            });
        }
        Err(err) => return Err(PackError::io(template_path, err)),
    };
    let mut discs: Value =
        serde_json::from_slice(&bytes).map_err(|err| PackError::MalformedTemplate {
            path: Some(template_path.to_path_buf()),
            reason: err.to_string(),
        })?;

    let disc = first_disc(&mut discs).map_err(|err| err.at_template(template_path))?;
    disc.insert("title".to_string(), Value::from(title));
    disc.insert("author".to_string(), Value::from(author));
    disc.insert("duration".to_string(), Value::from(duration));
    if !lores.is_empty() {
        disc.insert("lores".to_string(), Value::from(lores.to_vec()));
    }

    Ok(discs)
}

fn first_disc(discs: &mut Value) -> Result<&mut Map<String, Value>, PackError> {
    let malformed = |reason: &str| PackError::MalformedTemplate {
        path: None,
        reason: reason.to_string(),
    };
    match discs.as_array_mut().map(|array| array.first_mut()) {
        None => Err(malformed("top level is not a JSON array")),
        Some(None) => Err(malformed("disc array is empty")),
        Some(Some(Value::Object(disc))) => Ok(disc),
        Some(Some(_)) => Err(malformed("first disc is not an object")),
    }
}

/// Write the merged document with a 4-space indent.
pub fn write_discs(path: &Path, discs: &Value) -> Result<(), PackError> {
    let mut bytes = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut bytes, PrettyFormatter::with_indent(b"    "));
    discs
        .serialize(&mut serializer)
        .map_err(|source| PackError::Serialization {
            path: path.to_path_buf(),
            source,
        })?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| PackError::io(parent, err))?;
    }
    fs::write(path, bytes).map_err(|err| PackError::io(path, err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template(dir: &Path, contents: &str) -> std::path::PathBuf {
        let path = dir.join("discs.json");
        fs::write(&path, contents).expect("write template");
        path
    }

    const TEMPLATE: &str = r#"[
        {
            "title": "",
            "author": "",
            "duration": 0,
            "disc_namespace": "rss2jext",
            "model_data": 1,
            "creeper_drop": true,
            "lores": ["template lore"]
        },
        {"title": "Second", "author": "Other", "duration": 10}
    ]"#;

    #[test]
    fn overlays_first_disc_and_keeps_the_rest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = template(dir.path(), TEMPLATE);
        let lores = vec!["a".to_string(), "b".to_string()];

        let discs = build_discs(&path, "Ep 1", "Host", 185, &lores).expect("build");

        assert_eq!(discs[0]["title"], json!("Ep 1"));
        assert_eq!(discs[0]["author"], json!("Host"));
        assert_eq!(discs[0]["duration"], json!(185));
        assert_eq!(discs[0]["lores"], json!(["a", "b"]));
        assert_eq!(discs[0]["model_data"], json!(1));
        assert_eq!(discs[1]["title"], json!("Second"));
    }

    #[test]
    fn template_lores_survive_when_none_supplied() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = template(dir.path(), TEMPLATE);

        let discs = build_discs(&path, "Ep 1", "Host", 185, &[]).expect("build");

        assert_eq!(discs[0]["lores"], json!(["template lore"]));
    }

    #[test]
    fn rejects_more_than_two_lores() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = template(dir.path(), TEMPLATE);
        let lores = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        assert!(matches!(
            build_discs(&path, "Ep 1", "Host", 185, &lores),
            Err(PackError::TooManyLores { count: 3 })
        ));
    }

    #[test]
    fn rejects_templates_without_a_first_disc() {
        let dir = tempfile::tempdir().expect("tempdir");
        for contents in ["{}", "[]", "[1]"] {
            let path = template(dir.path(), contents);
            match build_discs(&path, "t", "a", 1, &[]) {
                Err(PackError::MalformedTemplate { path: Some(found), .. }) => {
                    assert_eq!(found, path);
                }
                other => panic!("unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn write_discs_uses_four_space_indent_and_integer_duration() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = template(dir.path(), r#"[{"title":"","author":"","duration":0}]"#);
        let discs = build_discs(&path, "Ep", "Host", 180, &[]).expect("build");
        let out = dir.path().join("out/discs.json");

        write_discs(&out, &discs).expect("write");

        let text = fs::read_to_string(&out).expect("read");
        assert_eq!(
            text,
            "[\n    {\n        \"title\": \"Ep\",\n        \"author\": \"Host\",\n        \"duration\": 180\n    }\n]"
        );
    }
}
