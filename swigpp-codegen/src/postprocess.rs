// Filesystem side effects around interface compiler runs.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, SwigppError};

static PROXY_INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"#(import|include)\s+"(.*)_proxy\.h""#).expect("invalid proxy include pattern")
});

/// Remove a directory tree if it exists.
pub fn clear_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        tracing::debug!(dir = %dir.display(), "clearing output directory");
        fs::remove_dir_all(dir).map_err(SwigppError::io(dir))?;
    }
    Ok(())
}

/// Delete an unwanted generated bootstrap file. A missing file is only a warning.
pub fn remove_generated(path: &Path) -> Result<()> {
    if !path.is_file() {
        crate::diag_warn!(path = %path.display(), "expected generated file not found");
        return Ok(());
    }
    fs::remove_file(path).map_err(SwigppError::io(path))
}

/// Rename `<stem>_proxy.{mm,h}` to `<prefix><stem>.{mm,h}` and point proxy includes
/// inside them at the renamed headers.
pub fn rename_objc_proxies(dir: &Path, stem: &str, prefix: &str) -> Result<()> {
    for ext in ["mm", "h"] {
        let from = dir.join(format!("{stem}_proxy.{ext}"));
        if !from.is_file() {
            crate::diag_warn!(path = %from.display(), "expected proxy file not found");
            continue;
        }
        let to = dir.join(format!("{prefix}{stem}.{ext}"));
        let text = fs::read_to_string(&from).map_err(SwigppError::io(&from))?;
        let rewritten = rewrite_proxy_includes(&text, prefix);
        fs::write(&to, rewritten.as_bytes()).map_err(SwigppError::io(&to))?;
        fs::remove_file(&from).map_err(SwigppError::io(&from))?;
        tracing::debug!(from = %from.display(), to = %to.display(), "renamed proxy");
    }
    Ok(())
}

fn rewrite_proxy_includes(text: &str, prefix: &str) -> String {
    PROXY_INCLUDE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            format!("#{} \"{prefix}{}.h\"", &caps[1], &caps[2])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_point_at_prefixed_headers() {
        let text = "#import \"MapPos_proxy.h\"\n#include  \"Layer_proxy.h\"\n#import <Foundation/Foundation.h>\n";
        assert_eq!(
            rewrite_proxy_includes(text, "NT"),
            "#import \"NTMapPos.h\"\n#include \"NTLayer.h\"\n#import <Foundation/Foundation.h>\n"
        );
    }

    #[test]
    fn proxies_are_renamed_and_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("MapPos_proxy.h"), "#import \"MapBounds_proxy.h\"\n").unwrap();
        fs::write(dir.path().join("MapPos_proxy.mm"), "#import \"MapPos_proxy.h\"\n").unwrap();

        rename_objc_proxies(dir.path(), "MapPos", "NT").unwrap();

        assert!(!dir.path().join("MapPos_proxy.h").exists());
        assert!(!dir.path().join("MapPos_proxy.mm").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("NTMapPos.h")).unwrap(),
            "#import \"NTMapBounds.h\"\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("NTMapPos.mm")).unwrap(),
            "#import \"NTMapPos.h\"\n"
        );
    }

    #[test]
    fn missing_generated_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        remove_generated(&dir.path().join("MapPosModule.cs")).unwrap();
        rename_objc_proxies(dir.path(), "MapPos", "NT").unwrap();
    }

    #[test]
    fn generated_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MapPosModule.java");
        fs::write(&path, "class MapPosModule {}").unwrap();
        remove_generated(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn clear_dir_tolerates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("generated/wrappers");
        clear_dir(&out).unwrap();
        fs::create_dir_all(out.join("core")).unwrap();
        clear_dir(&out).unwrap();
        assert!(!out.exists());
    }
}
