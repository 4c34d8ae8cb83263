//! Static, read-only guidance for well-known ports.
//! The ports view uses it to explain why an open port matters and what to do about it.

use strum::Display;

/// Broad family a service belongs to. Used as a prefix in the ports list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum ServiceCategory {
    #[strum(to_string = "Remote Access")]
    RemoteAccess,
    #[strum(to_string = "File Transfer")]
    FileTransfer,
    Database,
    Web,
    Mail,
}

/// Everything the UI needs to explain one exposed port.
pub struct PortDetail {
    pub port: u16,
    pub title: &'static str,
    pub category: ServiceCategory,
    /// Relative weight of the exposure, on the same 0-10 scale the scan service
    /// uses when it scores open ports.
    pub exposure: f64,
    pub description: &'static str,
    pub remediation: &'static str,
}

static PORTS: &[PortDetail] = &[
    // --- Remote Access ---
    PortDetail {
        port: 22,
        title: "SSH",
        category: ServiceCategory::RemoteAccess,
        exposure: 4.0,
        description: "Secure Shell gives interactive access to the host. It is encrypted, but an Internet-facing SSH daemon is a constant target for credential stuffing and brute force.",
        remediation: "Disable password authentication in favour of keys, forbid root login, and restrict the port to known source addresses or a VPN.",
    },
    PortDetail {
        port: 23,
        title: "Telnet",
        category: ServiceCategory::RemoteAccess,
        exposure: 7.0,
        description: "Telnet sends credentials and session data in clear text. Anyone on the network path can read or hijack the session.",
        remediation: "Turn Telnet off and use SSH instead. If a device only speaks Telnet, isolate it on a management network.",
    },
    PortDetail {
        port: 3389,
        title: "RDP",
        category: ServiceCategory::RemoteAccess,
        exposure: 7.0,
        description: "Remote Desktop exposed to the Internet is one of the most common ransomware entry points, through weak passwords and unpatched pre-authentication flaws.",
        remediation: "Put RDP behind a VPN or gateway, require Network Level Authentication and MFA, and keep the host patched.",
    },
    PortDetail {
        port: 5900,
        title: "VNC",
        category: ServiceCategory::RemoteAccess,
        exposure: 6.0,
        description: "VNC desktops are often protected by a short shared password or none at all, and many servers do not encrypt the session.",
        remediation: "Do not expose VNC publicly. Tunnel it over SSH or a VPN and set a strong password.",
    },

    // --- File Transfer ---
    PortDetail {
        port: 21,
        title: "FTP",
        category: ServiceCategory::FileTransfer,
        exposure: 6.0,
        description: "FTP transmits credentials and files unencrypted and frequently allows anonymous logins left over from defaults.",
        remediation: "Replace FTP with SFTP or FTPS, disable anonymous access, and restrict who can reach the service.",
    },
    PortDetail {
        port: 445,
        title: "SMB",
        category: ServiceCategory::FileTransfer,
        exposure: 8.0,
        description: "Windows file sharing has a long history of wormable vulnerabilities and should never be reachable from the Internet.",
        remediation: "Block SMB at the perimeter firewall and disable SMBv1 everywhere.",
    },

    // --- Databases ---
    PortDetail {
        port: 3306,
        title: "MySQL",
        category: ServiceCategory::Database,
        exposure: 6.0,
        description: "A database listener reachable from outside invites brute force against database accounts and exploitation of server vulnerabilities.",
        remediation: "Bind MySQL to localhost or a private interface and allow only application hosts through the firewall.",
    },
    PortDetail {
        port: 5432,
        title: "PostgreSQL",
        category: ServiceCategory::Database,
        exposure: 6.0,
        description: "PostgreSQL accepting remote connections exposes database accounts directly to the network.",
        remediation: "Restrict `listen_addresses` and `pg_hba.conf` to trusted hosts and require TLS for remote clients.",
    },
    PortDetail {
        port: 6379,
        title: "Redis",
        category: ServiceCategory::Database,
        exposure: 8.0,
        description: "Redis has no authentication by default; an exposed instance can be read, wiped, or abused to write files on the host.",
        remediation: "Bind Redis to localhost, enable `requirepass` or ACLs, and enable protected mode.",
    },
    PortDetail {
        port: 27017,
        title: "MongoDB",
        category: ServiceCategory::Database,
        exposure: 8.0,
        description: "Unauthenticated MongoDB instances are routinely found and ransomed by automated scanners.",
        remediation: "Enable authentication, bind to private interfaces, and firewall the port.",
    },

    // --- Web ---
    PortDetail {
        port: 80,
        title: "HTTP",
        category: ServiceCategory::Web,
        exposure: 2.0,
        description: "Plain HTTP carries traffic without encryption. It is acceptable only as a redirect to HTTPS.",
        remediation: "Redirect every request to HTTPS and send a Strict-Transport-Security header on the HTTPS side.",
    },
    PortDetail {
        port: 443,
        title: "HTTPS",
        category: ServiceCategory::Web,
        exposure: 1.0,
        description: "Encrypted web traffic. Expected for a public site; the risk lies in the application behind it, which the alerts view covers.",
        remediation: "Keep the TLS configuration modern and the certificate renewed automatically.",
    },
    PortDetail {
        port: 8080,
        title: "HTTP (alternate)",
        category: ServiceCategory::Web,
        exposure: 3.0,
        description: "Alternate HTTP ports often host admin consoles, staging builds or application servers that were never meant to be public.",
        remediation: "Check what is listening and close the port unless it is an intentional public endpoint.",
    },

    // --- Mail ---
    PortDetail {
        port: 25,
        title: "SMTP",
        category: ServiceCategory::Mail,
        exposure: 3.0,
        description: "An SMTP listener is normal for a mail server, but a misconfigured one can act as an open relay for spam.",
        remediation: "Verify relaying is restricted to authenticated users and that STARTTLS is offered.",
    },
];

/// Looks up the guidance for a port number, if the port is a well-known one.
pub fn get_port_detail(port: u16) -> Option<&'static PortDetail> {
    PORTS.iter().find(|p| p.port == port)
}
