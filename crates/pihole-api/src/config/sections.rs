// ── Configuration section types ──
//
// One struct per top-level section of the `config` document. Every leaf
// is optional: on read, `None` means the appliance did not report the
// field; on write, `None` means "leave unchanged" and is never serialized.
// The same value therefore works as a read-back state and as a patch.

use serde::{Deserialize, Serialize};

// ── DNS ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstreams: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname_records: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev_servers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listening_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnssec: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_logging: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_needed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand_hosts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bogus_priv: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localise: Option<bool>,
    #[serde(rename = "CNAMEdeepInspect", default, skip_serializing_if = "Option::is_none")]
    pub cname_deep_inspect: Option<bool>,
    #[serde(rename = "blockESNI", default, skip_serializing_if = "Option::is_none")]
    pub block_esni: Option<bool>,
    #[serde(rename = "EDNS0ECS", default, skip_serializing_if = "Option::is_none")]
    pub edns0_ecs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_localhost: Option<bool>,
    #[serde(rename = "showDNSSEC", default, skip_serializing_if = "Option::is_none")]
    pub show_dnssec: Option<bool>,
    #[serde(rename = "analyzeOnlyAandAAAA", default, skip_serializing_if = "Option::is_none")]
    pub analyze_only_a_and_aaaa: Option<bool>,
    #[serde(rename = "piholePTR", default, skip_serializing_if = "Option::is_none")]
    pub pihole_ptr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_when_busy: Option<String>,
    #[serde(rename = "blockTTL", default, skip_serializing_if = "Option::is_none")]
    pub block_ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_record: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<DnsDomain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<DnsCache>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocking: Option<DnsBlocking>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_domains: Option<DnsSpecialDomains>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<DnsReply>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<DnsRateLimit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsDomain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsCache {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<i64>,
    #[serde(rename = "upstreamBlockedTTL", default, skip_serializing_if = "Option::is_none")]
    pub upstream_blocked_ttl: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsBlocking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edns: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsSpecialDomains {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mozilla_canary: Option<bool>,
    #[serde(rename = "iCloudPrivateRelay", default, skip_serializing_if = "Option::is_none")]
    pub icloud_private_relay: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designated_resolver: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<DnsReplyAddresses>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocking: Option<DnsReplyAddresses>,
}

/// Addresses the resolver answers with instead of the real ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsReplyAddresses {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force4: Option<bool>,
    #[serde(rename = "IPv4", default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force6: Option<bool>,
    #[serde(rename = "IPv6", default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRateLimit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
}

// ── DHCP ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhcpConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rapid_commit: Option<bool>,
    #[serde(rename = "multiDNS", default, skip_serializing_if = "Option::is_none")]
    pub multi_dns: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_unknown_clients: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
}

// ── NTP ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NtpConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<NtpServe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<NtpServe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<NtpSync>,
}

/// NTP server side, per address family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NtpServe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NtpSync {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtc: Option<NtpRtc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NtpRtc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc: Option<bool>,
}

// ── Resolver ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverConfig {
    #[serde(rename = "resolveIPv4", default, skip_serializing_if = "Option::is_none")]
    pub resolve_ipv4: Option<bool>,
    #[serde(rename = "resolveIPv6", default, skip_serializing_if = "Option::is_none")]
    pub resolve_ipv6: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_names: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_names: Option<String>,
}

// ── Database ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(rename = "DBimport", default, skip_serializing_if = "Option::is_none")]
    pub db_import: Option<bool>,
    #[serde(rename = "maxDBdays", default, skip_serializing_if = "Option::is_none")]
    pub max_db_days: Option<i64>,
    #[serde(rename = "DBinterval", default, skip_serializing_if = "Option::is_none")]
    pub db_interval: Option<u32>,
    #[serde(rename = "useWAL", default, skip_serializing_if = "Option::is_none")]
    pub use_wal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<DatabaseNetwork>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseNetwork {
    #[serde(rename = "parseARPcache", default, skip_serializing_if = "Option::is_none")]
    pub parse_arp_cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<u32>,
}

// ── Webserver ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebserverConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<String>,
    /// Listening ports in civetweb syntax, e.g. `"80o,443os"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serve_all: Option<bool>,
    #[serde(rename = "advancedOpts", default, skip_serializing_if = "Option::is_none")]
    pub advanced_opts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<WebserverSession>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<WebserverTls>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<WebserverPaths>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<WebserverInterface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<WebserverApi>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebserverSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebserverTls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebserverPaths {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webroot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebserverInterface {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebserverApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sessions: Option<u32>,
    #[serde(rename = "prettyJSON", default, skip_serializing_if = "Option::is_none")]
    pub pretty_json: Option<bool>,
    #[serde(rename = "excludeClients", default, skip_serializing_if = "Option::is_none")]
    pub exclude_clients: Option<Vec<String>>,
    #[serde(rename = "excludeDomains", default, skip_serializing_if = "Option::is_none")]
    pub exclude_domains: Option<Vec<String>>,
    #[serde(rename = "maxHistory", default, skip_serializing_if = "Option::is_none")]
    pub max_history: Option<u32>,
    #[serde(rename = "maxClients", default, skip_serializing_if = "Option::is_none")]
    pub max_clients: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_history_global_max: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_destructive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<WebserverApiTemp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebserverApiTemp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

// ── Files ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity_tmp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macvendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<FilesLog>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ftl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnsmasq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webserver: Option<String>,
}

// ── Misc ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiscConfig {
    /// 0 (show everything) to 3 (anonymous mode).
    #[serde(rename = "privacylevel", default, skip_serializing_if = "Option::is_none")]
    pub privacy_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_startup: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nice: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr2line: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etc_dnsmasq_d: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnsmasq_lines: Option<Vec<String>>,
    #[serde(rename = "extraLogging", default, skip_serializing_if = "Option::is_none")]
    pub extra_logging: Option<bool>,
    #[serde(rename = "readOnly", default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(rename = "normalizeCPU", default, skip_serializing_if = "Option::is_none")]
    pub normalize_cpu: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_dnsmasq_warn: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<MiscCheck>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiscCheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shmem: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<u32>,
}

// ── Debug ──────────────────────────────────────────────────────────

/// Per-subsystem debug logging flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools, clippy::struct_field_names)]
pub struct DebugConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queries: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shmem: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overtime: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caps: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnssec: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vectors: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edns0: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clients: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliasclients: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inotify: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webserver: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netlink: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<bool>,
}
