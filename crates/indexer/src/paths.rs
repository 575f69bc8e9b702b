use crate::error::{IndexerError, Result};

/// Canonicalize a project root into the slash-separated form used as the
/// index key.
///
/// The same real directory can be spelled several ways depending on where
/// the path was produced: native Windows (`C:\work\app`), a WSL UNC view
/// (`\\wsl$\Ubuntu\home\dev\app`), or a drive mounted inside WSL
/// (`/mnt/c/work/app`). All spellings of one directory must normalize to
/// one key, otherwise the store fragments and re-uploads everything.
pub fn normalize_project_path(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IndexerError::InvalidPath("empty path".to_string()));
    }

    let slashed = trimmed.replace('\\', "/");
    let unwrapped = strip_wsl_prefix(&slashed);
    let drive_mapped = rewrite_mnt_drive(&unwrapped);
    let lowered = lower_drive_letter(&drive_mapped);

    resolve_dots(&lowered).ok_or_else(|| {
        IndexerError::InvalidPath(format!("cannot resolve to an absolute path: {raw}"))
    })
}

/// `//wsl$/<distro>/rest` and `//wsl.localhost/<distro>/rest` name a path as
/// seen from Windows; inside the environment it is just `/rest`.
fn strip_wsl_prefix(path: &str) -> String {
    let lower = path.to_ascii_lowercase();
    let prefix_len = if lower.starts_with("//wsl$/") {
        "//wsl$/".len()
    } else if lower.starts_with("//wsl.localhost/") {
        "//wsl.localhost/".len()
    } else {
        return path.to_string();
    };

    match path[prefix_len..].split_once('/') {
        Some((_distro, inner)) => format!("/{inner}"),
        None => "/".to_string(),
    }
}

/// `/mnt/<letter>/rest` is a Windows drive exposed inside WSL; map it back
/// to the native `<letter>:/rest` spelling.
fn rewrite_mnt_drive(path: &str) -> String {
    let Some(rest) = path.strip_prefix("/mnt/") else {
        return path.to_string();
    };
    let mut chars = rest.chars();
    let Some(letter) = chars.next().filter(char::is_ascii_alphabetic) else {
        return path.to_string();
    };

    let tail = chars.as_str();
    if tail.is_empty() {
        format!("{}:/", letter.to_ascii_lowercase())
    } else if let Some(inner) = tail.strip_prefix('/') {
        format!("{}:/{inner}", letter.to_ascii_lowercase())
    } else {
        path.to_string()
    }
}

fn lower_drive_letter(path: &str) -> String {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_uppercase() {
        let mut lowered = String::with_capacity(path.len());
        lowered.push(bytes[0].to_ascii_lowercase() as char);
        lowered.push_str(&path[1..]);
        lowered
    } else {
        path.to_string()
    }
}

/// Lexically resolve `.` and `..`, collapse repeated separators, and drop a
/// trailing separator. Returns `None` for relative paths and for `..`
/// sequences that climb past the root.
fn resolve_dots(path: &str) -> Option<String> {
    let (prefix, rest) = if path.len() >= 2 && path.as_bytes()[1] == b':' {
        (&path[..2], &path[2..])
    } else {
        ("", path)
    };
    if !rest.starts_with('/') {
        return None;
    }

    let mut stack: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop()?;
            }
            segment => stack.push(segment),
        }
    }

    Some(format!("{prefix}/{}", stack.join("/")))
}
