//! Reserved words of the ISC DHCP configuration language
//!
//! Keywords are matched case-insensitively. A keyword still counts as an
//! identifier wherever the grammar accepts one (option names, host names).

macro_rules! keywords {
    ($($variant:ident => $text:literal,)*) => {
        /// Keyword token
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            /// Canonical spelling
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Keyword::$variant => $text,)*
                }
            }

            /// Keyword spelled by `word`, ignoring case
            pub fn lookup(word: &str) -> Option<Keyword> {
                let lower = word.to_ascii_lowercase();
                match lower.as_str() {
                    $($text => Some(Keyword::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

keywords! {
    // Executable statements
    If => "if",
    Else => "else",
    Elsif => "elsif",
    Switch => "switch",
    Case => "case",
    Default => "default",
    On => "on",
    Define => "define",
    Set => "set",
    Unset => "unset",
    Eval => "eval",
    Return => "return",
    Log => "log",
    Break => "break",
    Add => "add",
    Zone => "zone",
    Key => "key",
    Execute => "execute",
    DbTimeFormat => "db-time-format",
    Local => "local",
    ParseVendorOption => "parse-vendor-option",
    Send => "send",
    Supersede => "supersede",
    Option => "option",
    Prepend => "prepend",
    Append => "append",
    Allow => "allow",
    Deny => "deny",
    Ignore => "ignore",

    // Log priorities
    Fatal => "fatal",
    Error => "error",
    Debug => "debug",
    Info => "info",

    // Events
    Expiry => "expiry",
    Commit => "commit",
    Release => "release",
    Transmission => "transmission",

    // Zones and keys
    Primary => "primary",
    Secondary => "secondary",
    Primary6 => "primary6",
    Secondary6 => "secondary6",
    Algorithm => "algorithm",
    Secret => "secret",

    // Expressions
    Check => "check",
    Not => "not",
    And => "and",
    Or => "or",
    Exists => "exists",
    Static => "static",
    Known => "known",
    Substring => "substring",
    Suffix => "suffix",
    Lcase => "lcase",
    Ucase => "ucase",
    Concat => "concat",
    BinaryToAscii => "binary-to-ascii",
    Reverse => "reverse",
    PickFirstValue => "pick-first-value",
    ConfigOption => "config-option",
    Hardware => "hardware",
    LeasedAddress => "leased-address",
    ClientState => "client-state",
    Filename => "filename",
    ServerName => "server-name",
    LeaseTime => "lease-time",
    Null => "null",
    HostDeclName => "host-decl-name",
    Packet => "packet",
    ExtractInt => "extract-int",
    EncodeInt => "encode-int",
    Defined => "defined",
    Gethostname => "gethostname",
    Gethostbyname => "gethostbyname",
    V6relay => "v6relay",
    Encapsulate => "encapsulate",

    // Symbolic constants
    Formerr => "formerr",
    Noerror => "noerror",
    Notauth => "notauth",
    Notimp => "notimp",
    Notzone => "notzone",
    Nxdomain => "nxdomain",
    Nxrrset => "nxrrset",
    Refused => "refused",
    Servfail => "servfail",
    Yxdomain => "yxdomain",
    Yxrrset => "yxrrset",
    Booting => "booting",
    Reboot => "reboot",
    Select => "select",
    Request => "request",
    Bound => "bound",
    Renew => "renew",
    Rebind => "rebind",

    // Option spaces and definitions
    Space => "space",
    Code => "code",
    Width => "width",
    Length => "length",
    Hash => "hash",
    Size => "size",
    Array => "array",
    Of => "of",
    Boolean => "boolean",
    Integer => "integer",
    Signed => "signed",
    Unsigned => "unsigned",
    IpAddress => "ip-address",
    Ip6Address => "ip6-address",
    DomainName => "domain-name",
    DomainList => "domain-list",
    Compressed => "compressed",
    Text => "text",
    String => "string",
    Zerolen => "zerolen",

    // Declarations
    Subnet => "subnet",
    Subnet6 => "subnet6",
    Netmask => "netmask",
    SharedNetwork => "shared-network",
    Pool => "pool",
    Pool6 => "pool6",
    Range => "range",
    Range6 => "range6",
    Host => "host",
    FixedAddress => "fixed-address",
    FixedAddress6 => "fixed-address6",
    Group => "group",
    Class => "class",
    Match => "match",
    Authoritative => "authoritative",
    Ethernet => "ethernet",
    TokenRing => "token-ring",
    Fddi => "fddi",
    Infiniband => "infiniband",
    Infinite => "infinite",
    True => "true",
    False => "false",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(Keyword::lookup("IF"), Some(Keyword::If));
        assert_eq!(Keyword::lookup("Pick-First-Value"), Some(Keyword::PickFirstValue));
        assert_eq!(Keyword::lookup("routers"), None);
    }

    #[test]
    fn test_as_str_round_trips() {
        for keyword in [Keyword::DbTimeFormat, Keyword::Subnet6, Keyword::V6relay] {
            assert_eq!(Keyword::lookup(keyword.as_str()), Some(keyword));
        }
    }
}
