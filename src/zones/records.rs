//! Record model (C7): a closed set of typed record variants sharing a
//! common header, plus owner-label resolution.

use crate::label::Label;
use std::fmt;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// `IN` / `CH`, the two classes this crate recognizes (§3). Other classes
/// that appear in the wild (`CS`, `HS`) are out of scope for zone-file
/// analysis and rejected as an unknown token, matching §4.5's "type token
/// is one of the registered record type names" disambiguation rule applied
/// symmetrically to class tokens.
#[derive(Copy, Clone, Debug, Display, EnumString, PartialEq, Eq, Hash)]
pub enum ClassType {
    #[strum(serialize = "IN")]
    Internet,
    #[strum(serialize = "CH")]
    Chaos,
}

impl Default for ClassType {
    fn default() -> Self {
        ClassType::Internet
    }
}

/// The default TTL used when neither a record nor a `$TTL` pragma supplies
/// one and the builder has not yet established a default (one day, per
/// the common BIND convention and §3's "default one day").
pub const DEFAULT_TTL: u32 = 86_400;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordData {
    A {
        address: Ipv4Addr,
    },
    Ns {
        target: String,
    },
    Cname {
        target: String,
    },
    Ptr {
        target: String,
    },
    Mx {
        priority: u16,
        target: String,
    },
    Afsdb {
        priority: u16,
        target: String,
    },
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    Txt {
        labels: Vec<String>,
    },
    Soa {
        primary: String,
        mail: String,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
}

impl RecordData {
    pub fn type_name(&self) -> &'static str {
        match self {
            RecordData::A { .. } => "A",
            RecordData::Ns { .. } => "NS",
            RecordData::Cname { .. } => "CNAME",
            RecordData::Ptr { .. } => "PTR",
            RecordData::Mx { .. } => "MX",
            RecordData::Afsdb { .. } => "AFSDB",
            RecordData::Srv { .. } => "SRV",
            RecordData::Txt { .. } => "TXT",
            RecordData::Soa { .. } => "SOA",
        }
    }
}

/// Every record type this crate recognizes in the `TYPE` position of a
/// zone-file line. `FromStr` is matched against the upper-cased token, so
/// callers normalize case before parsing (`strum`'s `EnumString` is
/// case-sensitive by default in the version this crate pins).
#[derive(Copy, Clone, Debug, Display, EnumString, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    NS,
    CNAME,
    PTR,
    MX,
    AFSDB,
    SRV,
    TXT,
    SOA,
}

impl RecordType {
    pub fn parse(token: &str) -> Option<RecordType> {
        RecordType::from_str(&token.to_ascii_uppercase()).ok()
    }
}

/// An immutable, fully-qualified resource record as emitted by the record
/// builder (C8). `label` and `origin` are kept separately (rather than
/// pre-joined) so `resolved_label`/`resolved_target` can be recomputed and
/// so `Display`/equality follow §3 exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    pub label: String,
    pub ttl: u32,
    pub class_type: ClassType,
    pub origin: String,
    pub path: PathBuf,
    pub data: RecordData,
}

impl Record {
    pub fn type_name(&self) -> &'static str {
        self.data.type_name()
    }

    pub fn resolved_label(&self) -> Label {
        Label::new(&self.label).resolve(&Label::new(&self.origin))
    }

    /// The rdata's target label, if this variant has one, resolved through
    /// the record's origin.
    pub fn resolved_target(&self) -> Option<Label> {
        let origin = Label::new(&self.origin);
        match &self.data {
            RecordData::Ns { target }
            | RecordData::Cname { target }
            | RecordData::Ptr { target }
            | RecordData::Mx { target, .. }
            | RecordData::Afsdb { target, .. }
            | RecordData::Srv { target, .. } => Some(Label::new(target).resolve(&origin)),
            RecordData::Soa { primary, .. } => Some(Label::new(primary).resolve(&origin)),
            RecordData::A { .. } | RecordData::Txt { .. } => None,
        }
    }

    /// Rdata fields exactly as written in the zone file.
    pub fn values(&self) -> Vec<String> {
        match &self.data {
            RecordData::A { address } => vec![address.to_string()],
            RecordData::Ns { target }
            | RecordData::Cname { target }
            | RecordData::Ptr { target } => vec![target.clone()],
            RecordData::Mx { priority, target } | RecordData::Afsdb { priority, target } => {
                vec![priority.to_string(), target.clone()]
            }
            RecordData::Srv {
                priority,
                weight,
                port,
                target,
            } => vec![
                priority.to_string(),
                weight.to_string(),
                port.to_string(),
                target.clone(),
            ],
            RecordData::Txt { labels } => labels.clone(),
            RecordData::Soa {
                primary,
                mail,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => vec![
                primary.clone(),
                mail.clone(),
                serial.to_string(),
                refresh.to_string(),
                retry.to_string(),
                expire.to_string(),
                minimum.to_string(),
            ],
        }
    }

    /// Rdata fields with any owner-name target re-resolved through
    /// `join_origin` (§4.6).
    pub fn origin_values(&self) -> Vec<String> {
        let origin = Label::new(&self.origin);
        let resolve = |s: &str| Label::new(s).resolve(&origin).as_str().to_string();
        match &self.data {
            RecordData::A { address } => vec![address.to_string()],
            RecordData::Ns { target } | RecordData::Cname { target } | RecordData::Ptr { target } => {
                vec![resolve(target)]
            }
            RecordData::Mx { priority, target } | RecordData::Afsdb { priority, target } => {
                vec![priority.to_string(), resolve(target)]
            }
            RecordData::Srv {
                priority,
                weight,
                port,
                target,
            } => vec![
                priority.to_string(),
                weight.to_string(),
                port.to_string(),
                resolve(target),
            ],
            RecordData::Txt { labels } => labels.clone(),
            RecordData::Soa {
                primary,
                mail,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => vec![
                resolve(primary),
                mail.clone(),
                serial.to_string(),
                refresh.to_string(),
                retry.to_string(),
                expire.to_string(),
                minimum.to_string(),
            ],
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.resolved_label().as_str(),
            self.ttl,
            self.class_type,
            self.type_name(),
            self.origin_values().join(" "),
        )
    }
}
