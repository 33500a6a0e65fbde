use serde::Serialize;
use thiserror::Error;

/// Access-control category of a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteScope {
    PublicRoot,
    PublicAsset,
    AdminArea,
    EmployeeArea,
    Unrestricted,
}

impl RouteScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteScope::PublicRoot => "public_root",
            RouteScope::PublicAsset => "public_asset",
            RouteScope::AdminArea => "admin_area",
            RouteScope::EmployeeArea => "employee_area",
            RouteScope::Unrestricted => "unrestricted",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("invalid route prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: &'static str },

    #[error("route prefix '{0}' is declared more than once")]
    Duplicate(String),
}

/// Route-to-scope table consulted by the gatekeeper
#[derive(Debug, Clone)]
pub struct RouteTable {
    /// Protected areas, longest prefix first
    areas: Vec<(String, RouteScope)>,
    asset_prefixes: Vec<String>,
}

impl RouteTable {
    pub fn new(
        areas: Vec<(String, RouteScope)>,
        asset_prefixes: Vec<String>,
    ) -> Result<Self, RouteTableError> {
        let mut seen: Vec<&str> = Vec::new();
        for prefix in areas.iter().map(|(p, _)| p).chain(asset_prefixes.iter()) {
            validate_prefix(prefix)?;
            if seen.contains(&prefix.as_str()) {
                return Err(RouteTableError::Duplicate(prefix.clone()));
            }
            seen.push(prefix);
        }

        for (prefix, scope) in &areas {
            if !matches!(scope, RouteScope::AdminArea | RouteScope::EmployeeArea) {
                return Err(RouteTableError::InvalidPrefix {
                    prefix: prefix.clone(),
                    reason: "only admin and employee areas can be declared",
                });
            }
        }

        let mut areas = areas;
        areas.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Ok(Self {
            areas,
            asset_prefixes,
        })
    }

    /// `/admin` and `/employee` areas plus the usual static asset directories
    pub fn standard() -> Result<Self, RouteTableError> {
        Self::new(
            vec![
                ("/admin".to_string(), RouteScope::AdminArea),
                ("/employee".to_string(), RouteScope::EmployeeArea),
            ],
            vec![
                "/_next".to_string(),
                "/static".to_string(),
                "/assets".to_string(),
            ],
        )
    }

    /// Classify a request path. The path is normalized first; matching is case-sensitive.
    pub fn classify(&self, path: &str) -> RouteScope {
        let path = normalize_path(path);

        if path == "/" {
            return RouteScope::PublicRoot;
        }

        if self
            .asset_prefixes
            .iter()
            .any(|prefix| is_under(&path, prefix))
        {
            return RouteScope::PublicAsset;
        }

        // Protected areas win over the file-extension heuristic so that
        // `/admin/report.csv` is never treated as a public asset
        if let Some((_, scope)) = self.areas.iter().find(|(prefix, _)| is_under(&path, prefix)) {
            return *scope;
        }

        if has_file_extension(&path) {
            return RouteScope::PublicAsset;
        }

        RouteScope::Unrestricted
    }
}

fn validate_prefix(prefix: &str) -> Result<(), RouteTableError> {
    let invalid = |reason| {
        Err(RouteTableError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason,
        })
    };

    if !prefix.starts_with('/') {
        return invalid("must start with '/'");
    }
    if prefix == "/" {
        return invalid("the root path cannot be a prefix");
    }
    if prefix.ends_with('/') {
        return invalid("must not end with '/'");
    }
    if normalize_path(prefix) != prefix {
        return invalid("must already be in normalized form");
    }
    Ok(())
}

/// Segment-boundary prefix match: `/admin` covers `/admin` and `/admin/x`, not `/administrator`
fn is_under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn has_file_extension(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or("");
    match last.rsplit_once('.') {
        Some((stem, ext)) => !stem.is_empty() && !ext.is_empty(),
        None => false,
    }
}

/// Normalize a request path: decode encoded dots and slashes, collapse repeated
/// slashes, resolve `.` and `..` (never above the root) and drop a trailing slash.
pub fn normalize_path(path: &str) -> String {
    let decoded = decode_separators(path);

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut normalized = String::with_capacity(decoded.len());
    for segment in segments {
        normalized.push('/');
        normalized.push_str(segment);
    }
    normalized
}

fn decode_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(idx) = rest.find('%') {
        out.push_str(&rest[..idx]);
        let candidate = &rest[idx..];
        let code = candidate.get(1..3).map(|hex| hex.to_ascii_lowercase());
        match code.as_deref() {
            Some("2e") => {
                out.push('.');
                rest = &candidate[3..];
            }
            Some("2f") => {
                out.push('/');
                rest = &candidate[3..];
            }
            _ => {
                out.push('%');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::standard().unwrap()
    }

    #[test]
    fn classifies_documented_paths() {
        let t = table();
        assert_eq!(t.classify("/admin/employees"), RouteScope::AdminArea);
        assert_eq!(t.classify("/employee/dashboard"), RouteScope::EmployeeArea);
        assert_eq!(t.classify("/"), RouteScope::PublicRoot);
        assert_eq!(t.classify("/favicon.ico"), RouteScope::PublicAsset);
    }

    #[test]
    fn area_roots_and_assets() {
        let t = table();
        assert_eq!(t.classify("/admin"), RouteScope::AdminArea);
        assert_eq!(t.classify("/employee"), RouteScope::EmployeeArea);
        assert_eq!(t.classify("/_next/static/chunks/main.js"), RouteScope::PublicAsset);
        assert_eq!(t.classify("/static/logo"), RouteScope::PublicAsset);
        assert_eq!(t.classify("/robots.txt"), RouteScope::PublicAsset);
        assert_eq!(t.classify("/about"), RouteScope::Unrestricted);
    }

    #[test]
    fn prefixes_match_on_segment_boundaries() {
        let t = table();
        assert_eq!(t.classify("/administrator"), RouteScope::Unrestricted);
        assert_eq!(t.classify("/employees"), RouteScope::Unrestricted);
    }

    #[test]
    fn extension_inside_protected_area_stays_protected() {
        let t = table();
        assert_eq!(t.classify("/admin/export.csv"), RouteScope::AdminArea);
        assert_eq!(t.classify("/employee/timesheets.json"), RouteScope::EmployeeArea);
    }

    #[test]
    fn classification_uses_normalized_path() {
        let t = table();
        assert_eq!(t.classify("/employee/../admin/employees"), RouteScope::AdminArea);
        assert_eq!(t.classify("//admin//employees/"), RouteScope::AdminArea);
        assert_eq!(t.classify("/admin/"), RouteScope::AdminArea);
        assert_eq!(t.classify("/static/..%2fadmin"), RouteScope::AdminArea);
        assert_eq!(t.classify("/%2E%2E/admin"), RouteScope::AdminArea);
        assert_eq!(t.classify("/admin/.."), RouteScope::PublicRoot);
        assert_eq!(t.classify(""), RouteScope::PublicRoot);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(table().classify("/Admin/employees"), RouteScope::Unrestricted);
    }

    #[test]
    fn normalize_path_cases() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/a/./b/../c/"), "/a/c");
        assert_eq!(normalize_path("/../../x"), "/x");
        assert_eq!(normalize_path("/100%25"), "/100%25");
        assert_eq!(normalize_path("/trailing%"), "/trailing%");
    }

    #[test]
    fn table_validation() {
        let bad = |prefix: &str| {
            RouteTable::new(vec![(prefix.to_string(), RouteScope::AdminArea)], vec![])
        };
        assert!(bad("admin").is_err());
        assert!(bad("/").is_err());
        assert!(bad("/admin/").is_err());
        assert!(bad("/a/../admin").is_err());

        let duplicate = RouteTable::new(
            vec![
                ("/admin".to_string(), RouteScope::AdminArea),
                ("/admin".to_string(), RouteScope::EmployeeArea),
            ],
            vec![],
        );
        assert_eq!(duplicate.unwrap_err(), RouteTableError::Duplicate("/admin".to_string()));

        let wrong_scope = RouteTable::new(vec![("/public".to_string(), RouteScope::PublicAsset)], vec![]);
        assert!(wrong_scope.is_err());
    }

    #[test]
    fn longest_prefix_wins() {
        let t = RouteTable::new(
            vec![
                ("/employee".to_string(), RouteScope::EmployeeArea),
                ("/employee/approvals".to_string(), RouteScope::AdminArea),
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(t.classify("/employee/approvals/3"), RouteScope::AdminArea);
        assert_eq!(t.classify("/employee/timesheets"), RouteScope::EmployeeArea);
    }
}
