use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;

use crate::timekeeping::{AttendanceZone, ClockSkewPolicy, TimePolicy};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Attendance
    pub utc_offset_minutes: i32,
    pub clock_skew: ClockSkewPolicy,

    // Employee directory cache
    pub directory_cache_ttl_secs: u64,
    pub directory_cache_capacity: u64,

    pub relay_addr: String,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,

            rate_protected_per_min: parse_or("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            utc_offset_minutes: parse_or("ATTENDANCE_UTC_OFFSET_MINUTES", 330)?,
            clock_skew: parse_or("ATTENDANCE_CLOCK_SKEW", ClockSkewPolicy::Classify)?,

            directory_cache_ttl_secs: parse_or("DIRECTORY_CACHE_TTL_SECS", 60)?,
            directory_cache_capacity: parse_or("DIRECTORY_CACHE_CAPACITY", 10_000)?,

            relay_addr: env::var("RELAY_ADDR").unwrap_or_else(|_| "0.0.0.0:5001".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        })
    }

    /// The single zone and skew rule every attendance computation runs under.
    pub fn time_policy(&self) -> Result<TimePolicy> {
        let zone = AttendanceZone::from_offset_minutes(self.utc_offset_minutes).ok_or_else(|| {
            anyhow!(
                "ATTENDANCE_UTC_OFFSET_MINUTES out of range: {}",
                self.utc_offset_minutes
            )
        })?;

        Ok(TimePolicy {
            zone,
            clock_skew: self.clock_skew,
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} has an invalid value {raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: "mysql://localhost/test".to_string(),
            jwt_secret: "test-secret".to_string(),
            server_addr: "127.0.0.1:0".to_string(),
            rate_protected_per_min: 1000,
            api_prefix: "/api".to_string(),
            utc_offset_minutes: 330,
            clock_skew: ClockSkewPolicy::Classify,
            directory_cache_ttl_secs: 60,
            directory_cache_capacity: 100,
            relay_addr: "127.0.0.1:0".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_policy_uses_configured_offset() {
        let config = Config::for_tests();
        let policy = config.time_policy().unwrap();
        assert_eq!(policy.zone.offset().local_minus_utc(), 330 * 60);
        assert_eq!(policy.clock_skew, ClockSkewPolicy::Classify);
    }

    #[test]
    fn time_policy_rejects_impossible_offset() {
        let mut config = Config::for_tests();
        config.utc_offset_minutes = 24 * 60;
        assert!(config.time_policy().is_err());
    }
}
