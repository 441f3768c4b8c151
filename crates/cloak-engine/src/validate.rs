//! Grammar checks for package and process names.

/// Reserved pseudo-package whose entries are process-name prefixes matching
/// sandboxed worker processes rather than an installed package.
pub const ISOLATED_PKG: &str = "isolated";

/// Check whether a (package, process) pair may enter the hide list.
///
/// Normal packages are dot-separated alphanumeric/underscore segments (a
/// package without any dot is rejected); their process names may contain
/// alphanumerics, underscore, colon and dot. For the reserved isolated
/// pseudo-package the process name is only validated up to the first colon,
/// since everything after it is a per-instance suffix.
pub fn validate(pkg: &str, proc: &str) -> bool {
    if pkg == ISOLATED_PKG {
        for c in proc.chars() {
            if c == ':' {
                break;
            }
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                continue;
            }
            return false;
        }
        return true;
    }

    let mut pkg_valid = false;
    for c in pkg.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            continue;
        }
        if c == '.' {
            pkg_valid = true;
            continue;
        }
        return false;
    }
    if !pkg_valid {
        return false;
    }

    proc.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':' || c == '.')
}
