use std::net::IpAddr;

use thiserror::Error;

/// Peer resolution failures that reject the message.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ResolveError {
    /// The peer's PTR record names an address literal and forged records are
    /// dropped.
    #[error("malicious PTR record for {ip}: \"{ptr_name}\"")]
    MaliciousEntity {
        /// Address of the peer.
        ip: IpAddr,
        /// Name published in the PTR record.
        ptr_name: String,
    },
}
