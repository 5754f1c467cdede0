//! Domain payload types returned by the API.
//!
//! These schemas are passed through as-is from the wire format. The client
//! never interprets them beyond extracting the identifier used for cache
//! writes (`ip` / `asn`). Deserialization is tolerant: almost every field
//! is optional so that server-side schema additions or field filtering
//! (see [`LookupOption::filter`](crate::LookupOption::filter)) never break
//! decoding.

use serde::{Deserialize, Serialize};

/// Category assigned to an autonomous system or company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsType {
    Business,
    Education,
    Government,
    Hosting,
    Inactive,
    Isp,
}

/// Regional internet registry managing an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegionalInternetRegistry {
    Afrinic,
    Apnic,
    Arin,
    Jpnic,
    Krnic,
    Lacnic,
    RipeNcc,
    Twnic,
}

/// Autonomous system record returned by ASN lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutonomousSystem {
    pub asn: u32,
    #[serde(default)]
    pub allocated: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub prefixes: Option<AutonomousSystemPrefixes>,
    #[serde(default)]
    pub relationships: Option<AutonomousSystemRelationships>,
    #[serde(default)]
    pub registry: Option<RegionalInternetRegistry>,
    #[serde(rename = "type", default)]
    pub kind: Option<AsType>,
    #[serde(default)]
    pub updated: Option<String>,
}

/// ASN lookup for the caller's own network identity.
///
/// The origin endpoint returns the same record shape as an explicit
/// ASN lookup.
pub type RequesterAutonomousSystem = AutonomousSystem;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutonomousSystemPrefixes {
    #[serde(default)]
    pub ipv4_count: u64,
    #[serde(default)]
    pub ipv6_count: u64,
    #[serde(default)]
    pub ipv4: Vec<AutonomousSystemPrefix>,
    #[serde(default)]
    pub ipv6: Vec<AutonomousSystemPrefix>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutonomousSystemPrefix {
    #[serde(default)]
    pub cidr: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub network_name: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub registry: Option<RegionalInternetRegistry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutonomousSystemRelationships {
    #[serde(default)]
    pub downstreams: Vec<u32>,
    #[serde(default)]
    pub peers: Vec<u32>,
    #[serde(default)]
    pub upstreams: Vec<u32>,
}

/// IP intelligence record returned by address lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpInfo {
    pub ip: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub carrier: Option<Carrier>,
    #[serde(default)]
    pub company: Option<Company>,
    #[serde(default)]
    pub connection: Option<Connection>,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub security: Option<Security>,
    #[serde(default)]
    pub time_zone: Option<TimeZone>,
}

/// IP lookup for the caller's own address; carries the requesting
/// user agent in addition to the standard record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequesterIpInfo {
    #[serde(flatten)]
    pub info: IpInfo,
    #[serde(default)]
    pub user_agent: Option<UserAgent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mcc: Option<String>,
    #[serde(default)]
    pub mnc: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<AsType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default)]
    pub asn: Option<u32>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<AsType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_native: Option<String>,
    #[serde(default)]
    pub plural: Option<String>,
    #[serde(default)]
    pub plural_native: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub symbol_native: Option<String>,
    #[serde(default)]
    pub format: Option<CurrencyFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    #[serde(default)]
    pub negative: Option<CurrencyFormatAffixes>,
    #[serde(default)]
    pub positive: Option<CurrencyFormatAffixes>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyFormatAffixes {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub continent: Option<Continent>,
    #[serde(default)]
    pub country: Option<Country>,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub in_eu: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Continent {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Country {
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub borders: Vec<String>,
    #[serde(default)]
    pub calling_code: Option<String>,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
    #[serde(default)]
    pub population_density: Option<f64>,
    #[serde(default)]
    pub flag: Option<Flag>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub tld: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub emoji_unicode: Option<String>,
    #[serde(default)]
    pub emojitwo: Option<String>,
    #[serde(default)]
    pub noto: Option<String>,
    #[serde(default)]
    pub twemoji: Option<String>,
    #[serde(default)]
    pub wikimedia: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub native: Option<String>,
}

/// Threat intelligence flags for an address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    #[serde(default)]
    pub is_abuser: bool,
    #[serde(default)]
    pub is_attacker: bool,
    #[serde(default)]
    pub is_bogon: bool,
    #[serde(default)]
    pub is_cloud_provider: bool,
    #[serde(default)]
    pub is_proxy: bool,
    #[serde(default)]
    pub is_relay: bool,
    #[serde(default)]
    pub is_tor: bool,
    #[serde(default)]
    pub is_tor_exit: bool,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub is_threat: bool,
    #[serde(default)]
    pub is_vpn: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeZone {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub current_time: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub offset: i32,
    #[serde(default)]
    pub in_daylight_saving: bool,
}

/// Parsed user-agent record.
///
/// Malformed input strings still yield a best-effort parse rather than a
/// per-item error, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAgent {
    /// The raw header string that was parsed.
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub version_major: Option<String>,
    #[serde(default)]
    pub device: Option<UserAgentDevice>,
    #[serde(default)]
    pub engine: Option<UserAgentEngine>,
    #[serde(default)]
    pub os: Option<UserAgentOperatingSystem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAgentDevice {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAgentEngine {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub version_major: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAgentOperatingSystem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Heuristic check for bot-like user agents.
///
/// Looks for common crawler keywords; simple and not exhaustive. Runs
/// locally, no API call.
pub fn is_bot(user_agent: &str) -> bool {
    let lower = user_agent.to_lowercase();
    lower.contains("bot")
        || lower.contains("crawl")
        || lower.contains("spider")
        || lower.contains("slurp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_info_decodes_with_minimal_fields() {
        let info: IpInfo = serde_json::from_str(r#"{"ip": "8.8.4.4"}"#).unwrap();
        assert_eq!(info.ip, "8.8.4.4");
        assert!(info.location.is_none());
    }

    #[test]
    fn ip_info_ignores_unknown_fields() {
        let json = r#"{"ip": "1.1.1.1", "some_future_field": {"x": 1}}"#;
        let info: IpInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.ip, "1.1.1.1");
    }

    #[test]
    fn autonomous_system_decodes_enums() {
        let json = r#"{"asn": 13335, "registry": "ARIN", "type": "hosting"}"#;
        let system: AutonomousSystem = serde_json::from_str(json).unwrap();
        assert_eq!(system.asn, 13335);
        assert_eq!(system.registry, Some(RegionalInternetRegistry::Arin));
        assert_eq!(system.kind, Some(AsType::Hosting));
    }

    #[test]
    fn requester_ip_info_flattens_base_record() {
        let json = r#"{"ip": "2.2.2.2", "user_agent": {"name": "Firefox"}}"#;
        let info: RequesterIpInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.info.ip, "2.2.2.2");
        assert_eq!(info.user_agent.unwrap().name.as_deref(), Some("Firefox"));
    }

    #[test]
    fn bot_detection() {
        assert!(is_bot("Mozilla/5.0 (compatible; Googlebot/2.1)"));
        assert!(is_bot("Yahoo! Slurp"));
        assert!(!is_bot(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Gecko/20100101 Firefox/120.0"
        ));
    }
}
