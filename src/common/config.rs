//! # Configuration Utilities
//!
//! Configuration structures and parsing shared by both device roles. Both
//! devices carry the same file shape: which role this device plays, the
//! address of device A, and the port the chat runs on.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::net::{Ipv4Addr, SocketAddr};

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: ChatConfig = load_config("config/device-a.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path))?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Chat configuration loaded from a TOML file.
///
/// The same file layout is deployed to both devices; only the `device`
/// field differs between the two sides.
///
/// # Example TOML
///
/// ```toml
/// device = "A"
/// port = 5000
///
/// [network]
/// A = "192.168.1.10"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Which role this device plays ("A" or "B", case-insensitive).
    ///
    /// Kept as a raw string so an invalid value is reported as a role
    /// error at dispatch time rather than a parse failure at load time.
    pub device: String,
    /// TCP port the chat runs on
    pub port: u16,
    /// Shared network addressing (both devices know where A lives)
    pub network: NetworkConfig,
}

/// Network addressing shared by both devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// IPv4 address of device A (e.g., "192.168.1.10")
    #[serde(rename = "A")]
    pub a: String,
}

impl ChatConfig {
    /// The single endpoint both roles care about: device A's address and
    /// the configured port. A binds it, B connects to it.
    pub fn endpoint(&self) -> Result<SocketAddr> {
        let ip: Ipv4Addr = self
            .network
            .a
            .parse()
            .with_context(|| format!("invalid IPv4 address '{}' for network.A", self.network.a))?;
        Ok(SocketAddr::from((ip, self.port)))
    }
}

/// The two fixed participants: A listens, B initiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    A,
    B,
}

impl Role {
    /// Parse the configured `device` value, accepting any letter casing.
    /// Returns `None` for anything that is not A or B.
    pub fn from_device(value: &str) -> Option<Role> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Role::A),
            "B" => Some(Role::B),
            _ => None,
        }
    }

    /// The other participant, used to label received messages.
    pub fn peer(self) -> Role {
        match self {
            Role::A => Role::B,
            Role::B => Role::A,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::A => write!(f, "A"),
            Role::B => write!(f, "B"),
        }
    }
}
