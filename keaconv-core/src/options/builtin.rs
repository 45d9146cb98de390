//! Built-in option tables

use super::{OptionDescriptor, OptionRegistry, OptionStatus, Space};
use OptionStatus::{Known, Special, Unknown};

type Entry = (&'static str, u32, &'static str, OptionStatus);

const SPACES: &[(&str, &str)] = &[
    ("dhcp", "dhcp4"),
    ("dhcp6", "dhcp6"),
    ("agent", "dhcp-agent-options-space"),
    ("server", "server"),
];

const DHCP4: &[Entry] = &[
    ("subnet-mask", 1, "I", Known),
    ("time-offset", 2, "l", Known),
    ("routers", 3, "IA", Known),
    ("time-servers", 4, "IA", Known),
    ("ien116-name-servers", 5, "IA", Known),
    ("domain-name-servers", 6, "IA", Known),
    ("log-servers", 7, "IA", Known),
    ("cookie-servers", 8, "IA", Known),
    ("lpr-servers", 9, "IA", Known),
    ("host-name", 12, "t", Known),
    ("boot-size", 13, "S", Known),
    ("merit-dump", 14, "t", Known),
    ("domain-name", 15, "t", Known),
    ("swap-server", 16, "I", Known),
    ("root-path", 17, "t", Known),
    ("extensions-path", 18, "t", Known),
    ("ip-forwarding", 19, "f", Known),
    ("default-ip-ttl", 23, "B", Known),
    ("interface-mtu", 26, "S", Known),
    ("broadcast-address", 28, "I", Known),
    ("static-routes", 33, "IIA", Known),
    ("nis-domain", 40, "t", Known),
    ("nis-servers", 41, "IA", Known),
    ("ntp-servers", 42, "IA", Known),
    ("vendor-encapsulated-options", 43, "E.", Known),
    ("netbios-name-servers", 44, "IA", Known),
    ("netbios-node-type", 46, "B", Known),
    ("netbios-scope", 47, "t", Known),
    ("dhcp-requested-address", 50, "I", Known),
    ("dhcp-lease-time", 51, "L", Known),
    ("dhcp-option-overload", 52, "B", Known),
    ("dhcp-message-type", 53, "B", Known),
    ("dhcp-server-identifier", 54, "I", Known),
    ("dhcp-parameter-request-list", 55, "BA", Known),
    ("dhcp-message", 56, "t", Known),
    ("dhcp-max-message-size", 57, "S", Known),
    ("dhcp-renewal-time", 58, "L", Known),
    ("dhcp-rebinding-time", 59, "L", Known),
    ("vendor-class-identifier", 60, "X", Known),
    ("dhcp-client-identifier", 61, "X", Known),
    ("nwip-domain", 62, "t", Known),
    ("tftp-server-name", 66, "t", Known),
    ("bootfile-name", 67, "t", Known),
    ("user-class", 77, "t", Known),
    ("rapid-commit", 80, "Z", Known),
    ("fqdn", 81, "Efqdn.", Unknown),
    ("relay-agent-information", 82, "Eagent.", Unknown),
    ("client-system", 93, "Sa", Known),
    ("client-ndi", 94, "BBB", Known),
    ("uuid-guid", 97, "BX", Known),
    ("subnet-selection", 118, "I", Known),
    ("domain-search", 119, "Dc", Known),
    ("classless-static-route", 121, "X", Known),
    ("vivco", 124, "Evendor-class.", Unknown),
    ("vivso", 125, "Evendor.", Unknown),
    ("pana-agent", 136, "IA", Known),
    ("v4-lost", 137, "d", Known),
    ("capwap-ac-v4", 138, "IA", Known),
    ("sip-ua-cs-domains", 141, "Dc", Known),
    ("rdnss-selection", 146, "BIID", Known),
    ("v4-portparams", 159, "BBS", Known),
    ("option-6rd", 212, "BB6Ia", Known),
    ("v4-access-domain", 213, "d", Known),
];

const DHCP6: &[Entry] = &[
    ("client-id", 1, "X", Known),
    ("server-id", 2, "X", Known),
    ("ia-na", 3, "Eia-na.", Unknown),
    ("ia-ta", 4, "Eia-ta.", Unknown),
    ("ia-addr", 5, "Eia-addr.", Unknown),
    ("oro", 6, "SA", Known),
    ("preference", 7, "B", Known),
    ("elapsed-time", 8, "S", Known),
    ("relay-msg", 9, "X", Known),
    ("unicast", 12, "6", Known),
    ("status-code", 13, "Nstatus-codes.to", Known),
    ("rapid-commit", 14, "Z", Known),
    ("user-class", 15, "X", Known),
    ("vendor-class", 16, "LX", Known),
    ("vendor-opts", 17, "Evsio.", Unknown),
    ("interface-id", 18, "X", Known),
    ("reconf-msg", 19, "Ndhcpv6-messages.", Known),
    ("reconf-accept", 20, "Z", Known),
    ("sip-servers-names", 21, "D", Known),
    ("sip-servers-addresses", 22, "6A", Known),
    ("name-servers", 23, "6A", Known),
    ("domain-search", 24, "D", Known),
    ("ia-pd", 25, "Eia-pd.", Unknown),
    ("ia-prefix", 26, "Eia-prefix.", Unknown),
    ("nis-servers", 27, "6A", Known),
    ("nisp-servers", 28, "6A", Known),
    ("nis-domain-name", 29, "D", Known),
    ("nisp-domain-name", 30, "D", Known),
    ("sntp-servers", 31, "6A", Known),
    ("info-refresh-time", 32, "T", Known),
    ("bcms-server-d", 33, "D", Known),
    ("bcms-server-a", 34, "6A", Known),
    ("geoconf-civic", 36, "X", Known),
    ("remote-id", 37, "X", Known),
    ("subscriber-id", 38, "X", Known),
    ("fqdn", 39, "Efqdn6.", Unknown),
    ("pana-agent", 40, "6A", Known),
    ("new-posix-timezone", 41, "t", Known),
    ("new-tzdb-timezone", 42, "t", Known),
    ("ero", 43, "SA", Known),
    ("lq-query", 44, "X", Known),
    ("client-data", 45, "X", Known),
    ("clt-time", 46, "L", Known),
    ("lq-relay-data", 47, "6X", Known),
    ("lq-client-link", 48, "6A", Known),
    ("aftr-name", 64, "d", Known),
    ("erp-local-domain-name", 65, "d", Known),
    ("rsoo", 66, "Ersoo.", Unknown),
    ("pd-exclude", 67, "X", Known),
    ("client-linklayer-addr", 79, "X", Known),
    ("solmax-rt", 82, "L", Known),
    ("inf-max-rt", 83, "L", Known),
];

const AGENT: &[Entry] = &[
    ("circuit-id", 1, "X", Known),
    ("remote-id", 2, "X", Known),
    ("agent-id", 3, "I", Unknown),
    ("DOCSIS-device-class", 4, "L", Known),
    ("link-selection", 5, "I", Known),
    ("relay-port", 19, "Z", Known),
];

// Server parameters: statements like `default-lease-time 600;` are
// modelled as options of the "server" space.
const SERVER: &[Entry] = &[
    ("default-lease-time", 1, "T", Special),
    ("max-lease-time", 2, "T", Known),
    ("min-lease-time", 3, "T", Known),
    ("dynamic-bootp-lease-cutoff", 4, "T", Unknown),
    ("dynamic-bootp-lease-length", 5, "L", Unknown),
    ("boot-unknown-clients", 6, "f", Unknown),
    ("dynamic-bootp", 7, "f", Unknown),
    ("allow-bootp", 8, "f", Unknown),
    ("allow-booting", 9, "f", Unknown),
    ("one-lease-per-client", 10, "f", Unknown),
    ("get-lease-hostnames", 11, "f", Unknown),
    ("use-host-decl-names", 12, "f", Unknown),
    ("use-lease-addr-for-default-route", 13, "f", Unknown),
    ("min-secs", 14, "B", Unknown),
    ("filename", 15, "t", Special),
    ("server-name", 16, "t", Special),
    ("next-server", 17, "I", Special),
    ("authoritative", 18, "f", Special),
    ("vendor-option-space", 19, "U", Unknown),
    ("always-reply-rfc1048", 20, "f", Unknown),
    ("site-option-space", 21, "X", Unknown),
    ("always-broadcast", 22, "f", Unknown),
    ("ddns-domainname", 23, "t", Special),
    ("ddns-hostname", 24, "t", Unknown),
    ("ddns-rev-domainname", 25, "t", Unknown),
    ("lease-file-name", 26, "t", Unknown),
    ("pid-file-name", 27, "t", Unknown),
    ("duplicates", 28, "f", Unknown),
    ("declines", 29, "f", Unknown),
    ("ddns-updates", 30, "f", Special),
    ("omapi-port", 31, "S", Unknown),
    ("local-port", 32, "S", Unknown),
    ("limited-broadcast-address", 33, "I", Unknown),
    ("remote-port", 34, "S", Unknown),
    ("local-address", 35, "I", Special),
    ("omapi-key", 36, "d", Unknown),
    ("stash-agent-options", 37, "f", Unknown),
    ("ddns-ttl", 38, "T", Unknown),
    ("ddns-update-style", 39, "Nddns-styles.", Special),
    ("client-updates", 40, "f", Unknown),
    ("update-optimization", 41, "f", Unknown),
    ("ping-check", 42, "f", Unknown),
    ("update-static-leases", 43, "f", Unknown),
    ("log-facility", 44, "Nsyslog-facilities.", Unknown),
    ("do-forward-updates", 45, "f", Unknown),
    ("ping-timeout", 46, "T", Unknown),
    ("infinite-is-reserved", 47, "f", Unknown),
    ("update-conflict-detection", 48, "f", Unknown),
    ("leasequery", 49, "f", Unknown),
    ("adaptive-lease-time-threshold", 50, "B", Unknown),
    ("do-reverse-updates", 51, "f", Unknown),
    ("fqdn-reply", 52, "f", Unknown),
    ("preferred-lifetime", 53, "T", Special),
    ("dhcpv6-lease-file-name", 54, "t", Unknown),
    ("dhcpv6-pid-file-name", 55, "t", Unknown),
    ("limit-addrs-per-ia", 56, "L", Unknown),
    ("limit-prefs-per-ia", 57, "L", Unknown),
    ("delayed-ack", 58, "S", Unknown),
    ("max-ack-delay", 59, "L", Unknown),
    ("dhcp-cache-threshold", 78, "B", Unknown),
    ("dont-use-fsync", 79, "f", Unknown),
    ("ddns-local-address4", 80, "I", Unknown),
    ("ddns-local-address6", 81, "6", Unknown),
    ("ignore-client-uids", 82, "f", Special),
    ("log-threshold-low", 83, "B", Unknown),
    ("log-threshold-high", 84, "B", Unknown),
    ("echo-client-id", 85, "f", Special),
    ("server-id-check", 86, "f", Unknown),
    ("prefix-length-mode", 87, "Nprefix_length_modes.", Unknown),
    ("dhcpv6-set-tee-times", 88, "f", Special),
    ("abandon-lease-time", 89, "T", Special),
];

pub(super) fn load(registry: &mut OptionRegistry) {
    for (old, name) in SPACES {
        registry.register_space(Space::new(old, name));
    }
    for (space, table) in [
        ("dhcp", DHCP4),
        ("dhcp6", DHCP6),
        ("agent", AGENT),
        ("server", SERVER),
    ] {
        for (name, code, format, status) in table {
            registry.register(OptionDescriptor::new(name, *code, space, format, *status));
        }
    }
}
