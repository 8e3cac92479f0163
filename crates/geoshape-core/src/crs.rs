//! Coordinate reference system values and CRS input resolution.
//!
//! A [`Crs`] is an immutable, cheaply cloneable identifier. It is produced by
//! the universal parser [`Crs::from_user_input`], which normalizes the many
//! notations users write CRS in and asks PROJ whether the result denotes a
//! reference system it can build. When PROJ knows the registry entry behind a
//! WKT, PROJJSON, name or PROJ string, that `AUTHORITY:CODE` becomes the
//! identity the value is compared by.

use crate::error::{GeoshapeError, Result};
use proj::Proj;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// Normalized form of a CRS definition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CrsDefinition {
    /// `AUTHORITY:CODE`, both upper-cased (e.g. `EPSG:4326`, `OGC:CRS84`)
    Authority { authority: String, code: String },
    /// PROJ string (`+proj=...`), whitespace-collapsed
    ProjString(String),
    /// WKT1 or WKT2, whitespace-collapsed
    Wkt(String),
    /// PROJJSON document
    ProjJson(String),
    /// Anything else PROJ may know by name (e.g. `WGS 84`)
    Name(String),
}

impl CrsDefinition {
    /// Normalize a user representation without consulting PROJ.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(GeoshapeError::invalid_crs(input, "CRS definition is empty"));
        }

        // Bare integers are EPSG codes
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Ok(Self::authority("EPSG", trimmed));
        }

        if trimmed.to_ascii_lowercase().starts_with("urn:ogc:def:crs:") {
            return parse_ogc_urn(trimmed)
                .ok_or_else(|| GeoshapeError::invalid_crs(input, "malformed OGC URN"));
        }

        if trimmed.starts_with('{') {
            return Ok(Self::ProjJson(trimmed.to_string()));
        }

        if trimmed.starts_with('+') || trimmed.contains("+proj=") || trimmed.contains("+init=") {
            return Ok(Self::ProjString(collapse_whitespace(trimmed)));
        }

        if trimmed.contains('[') {
            return Ok(Self::Wkt(collapse_whitespace(trimmed)));
        }

        if let Some((authority, code)) = split_authority_code(trimmed) {
            return Ok(Self::authority(authority, code));
        }

        Ok(Self::Name(collapse_whitespace(trimmed)))
    }

    fn authority(authority: &str, code: &str) -> Self {
        Self::Authority {
            authority: authority.to_ascii_uppercase(),
            code: code.to_ascii_uppercase(),
        }
    }

    /// The string handed to PROJ
    pub fn as_definition(&self) -> Cow<'_, str> {
        match self {
            Self::Authority { authority, code } => Cow::Owned(format!("{}:{}", authority, code)),
            Self::ProjString(s) | Self::Wkt(s) | Self::ProjJson(s) | Self::Name(s) => {
                Cow::Borrowed(s)
            }
        }
    }
}

/// `urn:ogc:def:crs:EPSG::4326` or `urn:ogc:def:crs:OGC:1.3:CRS84`
fn parse_ogc_urn(urn: &str) -> Option<CrsDefinition> {
    let parts: Vec<&str> = urn.split(':').collect();
    if parts.len() < 6 {
        return None;
    }
    let authority = parts[4];
    let code = parts[parts.len() - 1];
    if authority.is_empty() || code.is_empty() {
        return None;
    }
    Some(CrsDefinition::authority(authority, code))
}

fn split_authority_code(s: &str) -> Option<(&str, &str)> {
    let (authority, code) = s.split_once(':')?;
    let valid_authority =
        !authority.is_empty() && authority.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let valid_code = !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric());
    (valid_authority && valid_code).then_some((authority, code))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Read the `AUTHORITY:CODE` a PROJJSON document is registered under
fn authority_from_projjson(json: &str) -> Option<CrsDefinition> {
    let value: serde_json::Value = serde_json::from_str(json).ok()?;
    let id = match value.get("id") {
        Some(id) => id,
        None => value.get("ids")?.as_array()?.first()?,
    };

    let authority = id.get("authority")?.as_str()?;
    let code = match id.get("code")? {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => return None,
    };
    Some(CrsDefinition::authority(authority, &code))
}

/// Coordinate Reference System
///
/// Two values are equal iff they denote the same reference system:
/// `"epsg:4326"`, `4326`, `"urn:ogc:def:crs:EPSG::4326"`, the name `"WGS 84"`
/// and a WKT or PROJJSON document carrying `ID["EPSG",4326]` all compare
/// equal. Definitions PROJ cannot tie to a registry entry compare by their
/// normalized text. `OGC:CRS84` and `EPSG:4326` are distinct systems because
/// their axis order differs.
#[derive(Debug, Clone)]
pub struct Crs {
    inner: Arc<CrsInner>,
}

#[derive(Debug)]
struct CrsInner {
    /// What the caller wrote, normalized
    definition: CrsDefinition,
    /// Registry identity when PROJ knows one, otherwise `definition`
    identity: CrsDefinition,
}

impl Crs {
    /// Universal parser: normalize `input` and validate it with PROJ.
    pub fn from_user_input(input: &str) -> Result<Self> {
        let definition = CrsDefinition::parse(input)?;
        Self::validated(input, definition)
    }

    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Result<Self> {
        let definition = CrsDefinition::authority("EPSG", &code.to_string());
        Self::validated(&code.to_string(), definition)
    }

    /// Create a CRS from an authority name and code, e.g. `("ESRI", "54009")`
    pub fn from_authority(authority: &str, code: &str) -> Result<Self> {
        match split_authority_code(&format!("{}:{}", authority, code)) {
            Some((authority, code)) => {
                let definition = CrsDefinition::authority(authority, code);
                Self::validated(&format!("{}:{}", authority, code), definition)
            }
            None => Err(GeoshapeError::invalid_crs(
                format!("{}:{}", authority, code),
                "authority and code must be non-empty alphanumeric identifiers",
            )),
        }
    }

    fn validated(input: &str, definition: CrsDefinition) -> Result<Self> {
        let proj = Proj::new(&definition.as_definition())
            .map_err(|e| GeoshapeError::invalid_crs(input, e.to_string()))?;
        let identity = identify(&definition, &proj);
        Ok(Self { inner: Arc::new(CrsInner { definition, identity }) })
    }

    /// Normalized definition, in the notation it was given
    pub fn kind(&self) -> &CrsDefinition {
        &self.inner.definition
    }

    /// Definition string suitable for PROJ
    pub fn definition(&self) -> Cow<'_, str> {
        self.inner.definition.as_definition()
    }

    /// `AUTHORITY:CODE` of the registry entry this CRS denotes, if known
    pub fn authority_code(&self) -> Option<String> {
        match &self.inner.identity {
            CrsDefinition::Authority { authority, code } => {
                Some(format!("{}:{}", authority, code))
            }
            _ => None,
        }
    }

    /// EPSG code of the registry entry this CRS denotes, if known
    pub fn epsg(&self) -> Option<u32> {
        match &self.inner.identity {
            CrsDefinition::Authority { authority, code } if authority == "EPSG" => {
                code.parse().ok()
            }
            _ => None,
        }
    }

    /// WGS 84 longitude/latitude (EPSG:4326 or OGC:CRS84)
    pub fn is_geographic_wgs84(&self) -> bool {
        matches!(
            self.authority_code().as_deref(),
            Some("EPSG:4326") | Some("OGC:CRS84")
        )
    }
}

/// Authority definitions are their own identity; other notations are looked
/// up through the `id` PROJ reports in its PROJJSON export.
fn identify(definition: &CrsDefinition, proj: &Proj) -> CrsDefinition {
    if matches!(definition, CrsDefinition::Authority { .. }) {
        return definition.clone();
    }

    match proj.to_projjson(None, None, None).ok().as_deref().and_then(authority_from_projjson) {
        Some(identity) => {
            tracing::debug!(identity = %identity.as_definition(), "Identified CRS definition");
            identity
        }
        None => definition.clone(),
    }
}

impl PartialEq for Crs {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.identity == other.inner.identity
    }
}

impl Eq for Crs {}

impl Hash for Crs {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.identity.hash(state);
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.definition())
    }
}

impl FromStr for Crs {
    type Err = GeoshapeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_user_input(s)
    }
}

impl Serialize for Crs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.definition())
    }
}

impl<'de> Deserialize<'de> for Crs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Crs::from_user_input(&s).map_err(serde::de::Error::custom)
    }
}

/// Anything that can be resolved to an optional CRS
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CrsInput {
    /// No CRS
    #[default]
    None,
    /// An already resolved CRS
    Crs(Crs),
    /// The CRS attached to a CRS-aware geometry, possibly absent
    Shape(Option<Crs>),
    /// EPSG code
    Epsg(u32),
    /// Authority name and code
    Authority { authority: String, code: String },
    /// Any textual notation understood by [`Crs::from_user_input`]
    Text(String),
}

impl CrsInput {
    /// Resolve to a single optional CRS.
    ///
    /// Raw representations go through [`Crs::from_user_input`]; every failure
    /// is reported as [`GeoshapeError::InvalidCrs`].
    pub fn resolve(self) -> Result<Option<Crs>> {
        match self {
            CrsInput::None => Ok(None),
            CrsInput::Crs(crs) => Ok(Some(crs)),
            CrsInput::Shape(crs) => Ok(crs),
            CrsInput::Epsg(code) => Crs::from_epsg(code).map(Some),
            CrsInput::Authority { authority, code } => {
                Crs::from_authority(&authority, &code).map(Some)
            }
            CrsInput::Text(text) => Crs::from_user_input(&text).map(Some),
        }
    }
}

impl From<Crs> for CrsInput {
    fn from(crs: Crs) -> Self {
        CrsInput::Crs(crs)
    }
}

impl From<&Crs> for CrsInput {
    fn from(crs: &Crs) -> Self {
        CrsInput::Crs(crs.clone())
    }
}

impl From<Option<Crs>> for CrsInput {
    fn from(crs: Option<Crs>) -> Self {
        crs.map_or(CrsInput::None, CrsInput::Crs)
    }
}

impl From<u32> for CrsInput {
    fn from(code: u32) -> Self {
        CrsInput::Epsg(code)
    }
}

impl From<&str> for CrsInput {
    fn from(text: &str) -> Self {
        CrsInput::Text(text.to_string())
    }
}

impl From<String> for CrsInput {
    fn from(text: String) -> Self {
        CrsInput::Text(text)
    }
}

impl From<Option<&str>> for CrsInput {
    fn from(text: Option<&str>) -> Self {
        text.map_or(CrsInput::None, CrsInput::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_authority_code_is_case_insensitive() {
        let lower = CrsDefinition::parse("epsg:4326").unwrap();
        let upper = CrsDefinition::parse("EPSG:4326").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.as_definition(), "EPSG:4326");
    }

    #[test]
    fn test_parse_bare_integer_as_epsg() {
        assert_eq!(
            CrsDefinition::parse(" 3857 ").unwrap(),
            CrsDefinition::parse("EPSG:3857").unwrap()
        );
    }

    #[test]
    fn test_parse_ogc_urn() {
        assert_eq!(
            CrsDefinition::parse("urn:ogc:def:crs:EPSG::4326").unwrap().as_definition(),
            "EPSG:4326"
        );
        assert_eq!(
            CrsDefinition::parse("urn:ogc:def:crs:OGC:1.3:CRS84").unwrap().as_definition(),
            "OGC:CRS84"
        );
        assert!(CrsDefinition::parse("urn:ogc:def:crs:EPSG").is_err());
    }

    #[test]
    fn test_parse_proj_string_collapses_whitespace() {
        let def = CrsDefinition::parse("+proj=longlat   +datum=WGS84\n+no_defs").unwrap();
        assert_eq!(def, CrsDefinition::ProjString("+proj=longlat +datum=WGS84 +no_defs".into()));
    }

    #[test]
    fn test_parse_wkt_and_projjson() {
        assert!(matches!(
            CrsDefinition::parse(r#"GEOGCS["WGS 84", DATUM["WGS_1984"]]"#).unwrap(),
            CrsDefinition::Wkt(_)
        ));
        assert!(matches!(
            CrsDefinition::parse(r#"{"type": "GeographicCRS"}"#).unwrap(),
            CrsDefinition::ProjJson(_)
        ));
    }

    #[test]
    fn test_parse_empty_is_invalid() {
        let err = CrsDefinition::parse("   ").unwrap_err();
        assert!(matches!(err, GeoshapeError::InvalidCrs { .. }));
    }

    #[test]
    fn test_equivalent_notations_resolve_equal() {
        let a = Crs::from_user_input("epsg:4326").unwrap();
        let b = Crs::from_epsg(4326).unwrap();
        let c = Crs::from_user_input("urn:ogc:def:crs:EPSG::4326").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.epsg(), Some(4326));
        assert!(a.is_geographic_wgs84());
    }

    #[test]
    fn test_authority_from_projjson() {
        assert_eq!(
            authority_from_projjson(r#"{"type": "GeographicCRS", "id": {"authority": "EPSG", "code": 4326}}"#),
            Some(CrsDefinition::authority("EPSG", "4326"))
        );
        assert_eq!(
            authority_from_projjson(r#"{"ids": [{"authority": "OGC", "code": "CRS84"}]}"#),
            Some(CrsDefinition::authority("OGC", "CRS84"))
        );
        assert_eq!(authority_from_projjson(r#"{"type": "GeographicCRS"}"#), None);
        assert_eq!(authority_from_projjson("not json"), None);
    }

    #[test]
    fn test_equality_and_hash_follow_identity() {
        use std::collections::HashSet;

        let by_code = Crs::from_epsg(4326).unwrap();
        let by_name = Crs::from_user_input("WGS 84").unwrap();
        assert_eq!(by_code, by_name);
        assert!(matches!(by_name.kind(), CrsDefinition::Name(_)));
        assert_eq!(by_name.epsg(), Some(4326));

        let set: HashSet<Crs> = [by_code, by_name].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_crs84_differs_from_epsg_4326() {
        let crs84 = Crs::from_user_input("OGC:CRS84").unwrap();
        let epsg = Crs::from_epsg(4326).unwrap();
        assert_ne!(crs84, epsg);
        assert!(crs84.is_geographic_wgs84());
        assert_eq!(crs84.epsg(), None);
    }

    #[test]
    fn test_unknown_crs_is_invalid() {
        let err = Crs::from_user_input("not a crs at all").unwrap_err();
        assert!(matches!(err, GeoshapeError::InvalidCrs { .. }));

        let err = Crs::from_user_input("EPSG:99999999").unwrap_err();
        assert!(matches!(err, GeoshapeError::InvalidCrs { .. }));
    }

    #[test]
    fn test_resolve_inputs() {
        let wgs84 = Crs::from_epsg(4326).unwrap();

        assert_eq!(CrsInput::None.resolve().unwrap(), None);
        assert_eq!(CrsInput::from(&wgs84).resolve().unwrap(), Some(wgs84.clone()));
        assert_eq!(CrsInput::Shape(None).resolve().unwrap(), None);
        assert_eq!(CrsInput::Shape(Some(wgs84.clone())).resolve().unwrap(), Some(wgs84.clone()));
        assert_eq!(CrsInput::from(4326).resolve().unwrap(), Some(wgs84.clone()));
        assert_eq!(CrsInput::from("EPSG:4326").resolve().unwrap(), Some(wgs84.clone()));
        assert_eq!(
            CrsInput::Authority { authority: "epsg".into(), code: "4326".into() }
                .resolve()
                .unwrap(),
            Some(wgs84)
        );
        assert_eq!(CrsInput::from(None::<&str>).resolve().unwrap(), None);
    }

    #[test]
    fn test_resolve_invalid_text_is_invalid_crs() {
        let err = CrsInput::from("definitely:not:a:crs").resolve().unwrap_err();
        assert!(matches!(err, GeoshapeError::InvalidCrs { .. }));
    }

    #[test]
    fn test_serde_uses_definition_string() {
        let crs = Crs::from_user_input("epsg:3857").unwrap();
        let json = serde_json::to_string(&crs).unwrap();
        assert_eq!(json, "\"EPSG:3857\"");

        let parsed: Crs = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, crs);

        assert!(serde_json::from_str::<Crs>("\"nope nope\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_epsg_notations_normalize_identically(code in 1u32..100_000) {
            let bare = CrsDefinition::parse(&code.to_string()).unwrap();
            let lower = CrsDefinition::parse(&format!("epsg:{}", code)).unwrap();
            let urn = CrsDefinition::parse(&format!("urn:ogc:def:crs:EPSG::{}", code)).unwrap();
            prop_assert_eq!(&bare, &lower);
            prop_assert_eq!(&lower, &urn);
        }
    }
}
