//! Typed process configuration.
//!
//! Values come from the environment (and a `.env` file, through [`dotenvy`]) and are
//! deserialized straight into [`Env`]. The deserializer is driven by the target struct: each
//! declared field name is looked up once, so unrelated variables are never parsed.
//! Comma-separated values deserialize into sequences.

use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::slice;
use std::str::FromStr;

use serde::Deserialize;
use serde::de::value::SeqDeserializer;
use serde::de::{self, IntoDeserializer};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Env {
    #[serde(default = "default_port")]
    pub server_api_port: u16,
    #[serde(default = "default_bind_addr")]
    pub server_bind_addr: IpAddr,
    #[serde(default = "default_cors_origins")]
    pub cors_allow_origins: Vec<String>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_analysis_delay_ms")]
    pub analysis_delay_ms: u64,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub log_format: LogFormat,
    pub otel_exporter_otlp_endpoint: Option<String>,
    #[serde(default = "default_service_name")]
    pub api_service_name: String,
    #[serde(default = "default_tracer_name")]
    pub api_tracer_name: String,
}

const fn default_port() -> u16 {
    5000
}

const fn default_bind_addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

const fn default_seed() -> u64 {
    42
}

const fn default_analysis_delay_ms() -> u64 {
    1500
}

fn default_log_filter() -> String {
    "momentum_api=debug,tower_http=debug,axum=debug,info".to_string()
}

fn default_service_name() -> String {
    "momentum-api".to_string()
}

fn default_tracer_name() -> String {
    "momentum-tracer".to_string()
}

impl Env {
    /// Reads the process environment, loading `.env` first if one exists.
    pub fn load() -> EnvResult<Self> {
        from_iter(dotenvy::vars())
    }

    /// The collector endpoint, if telemetry export is switched on.
    pub fn otel_endpoint(&self) -> Option<&str> {
        self.otel_exporter_otlp_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
    }
}

/// Deserializes `T` from `(key, value)` pairs. Only keys naming one of `T`'s fields are read.
pub fn from_iter<Iter, T>(iter: Iter) -> EnvResult<T>
where
    T: de::DeserializeOwned,
    Iter: IntoIterator<Item = (String, String)>,
{
    T::deserialize(Source {
        vars: iter.into_iter().collect(),
    })
}

pub type EnvResult<T> = core::result::Result<T, EnvErr>;

#[derive(Debug, Error)]
pub enum EnvErr {
    #[error("env deserialization error: {0}")]
    Custom(String),

    #[error("missing environment variable '{0}'")]
    MissingValue(&'static str),
}

impl de::Error for EnvErr {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        EnvErr::Custom(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        EnvErr::MissingValue(field)
    }
}

// ---
//  Deserializer implementation
// ---

/// Every variable visible to the process, keyed by name.
struct Source {
    vars: BTreeMap<String, String>,
}

impl<'de> de::Deserializer<'de> for Source {
    type Error = EnvErr;

    fn deserialize_struct<V>(
        self,
        _: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(Fields {
            vars: self.vars,
            fields: fields.iter(),
            pending: None,
        })
    }

    fn deserialize_any<V>(self, _: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        Err(EnvErr::Custom(
            "environment can only be read into a struct".to_string(),
        ))
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 u8 u16 u32 u64 f32 f64 char str string bytes byte_buf
        option unit unit_struct newtype_struct seq tuple tuple_struct map enum
        identifier ignored_any
    }
}

/// Walks a struct's declared field names, yielding those that are set.
struct Fields {
    vars: BTreeMap<String, String>,
    fields: slice::Iter<'static, &'static str>,
    pending: Option<Value>,
}

impl<'de> de::MapAccess<'de> for Fields {
    type Error = EnvErr;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: de::DeserializeSeed<'de>,
    {
        for &key in self.fields.by_ref() {
            if let Some(raw) = self.vars.remove(key) {
                self.pending = Some(Value { key, raw });
                return seed.deserialize(key.into_deserializer()).map(Some);
            }
        }

        Ok(None)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.pending.take() {
            Some(value) => seed.deserialize(value),
            None => Err(EnvErr::Custom("value read before its key".to_string())),
        }
    }
}

/// One variable's raw text; `key` is kept for error messages.
struct Value {
    key: &'static str,
    raw: String,
}

impl Value {
    fn parse<T>(&self) -> EnvResult<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.raw
            .trim()
            .parse()
            .map_err(|e| EnvErr::Custom(format!("{}={:?}: {e}", self.key, self.raw)))
    }
}

impl<'de> IntoDeserializer<'de, EnvErr> for Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}

macro_rules! visit_parsed {
    ($($method:ident => $visit:ident($ty:ty),)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, EnvErr>
            where
                V: de::Visitor<'de>,
            {
                visitor.$visit(self.parse::<$ty>()?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Value {
    type Error = EnvErr;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.raw)
    }

    /// Comma-separated items; a blank value is an empty list.
    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let key = self.key;
        let items = self
            .raw
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| Value {
                key,
                raw: item.to_owned(),
            });

        visitor.visit_seq(SeqDeserializer::new(items))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    /// Unit variants only, matched case-insensitively.
    fn deserialize_enum<V>(
        self,
        _: &'static str,
        _: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(self.raw.trim().to_lowercase().into_deserializer())
    }

    fn deserialize_newtype_struct<V>(
        self,
        _: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    visit_parsed! {
        deserialize_bool => visit_bool(bool),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
    }

    serde::forward_to_deserialize_any! {
        char str string unit bytes byte_buf map
        unit_struct tuple_struct identifier tuple
        ignored_any struct
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_unset() {
        let env: Env = from_iter(vars(&[("PATH", "/usr/bin")])).unwrap();

        assert_eq!(env.server_api_port, 5000);
        assert_eq!(env.server_bind_addr, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(env.cors_allow_origins, vec!["*"]);
        assert_eq!(env.seed, 42);
        assert_eq!(env.analysis_delay_ms, 1500);
        assert_eq!(env.log_format, LogFormat::Pretty);
        assert_eq!(env.otel_endpoint(), None);
        assert_eq!(env.api_service_name, "momentum-api");
    }

    #[test]
    fn test_typed_values() {
        let env: Env = from_iter(vars(&[
            ("SERVER_API_PORT", "8080"),
            ("SERVER_BIND_ADDR", "127.0.0.1"),
            ("CORS_ALLOW_ORIGINS", "example.com, app.example.org"),
            ("SEED", "7"),
            ("ANALYSIS_DELAY_MS", "0"),
            ("LOG_FORMAT", "JSON"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
        ]))
        .unwrap();

        assert_eq!(env.server_api_port, 8080);
        assert_eq!(env.server_bind_addr, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(env.cors_allow_origins, vec!["example.com", "app.example.org"]);
        assert_eq!(env.seed, 7);
        assert_eq!(env.analysis_delay_ms, 0);
        assert_eq!(env.log_format, LogFormat::Json);
        assert_eq!(env.otel_endpoint(), Some("http://localhost:4317"));
    }

    #[test]
    fn test_only_declared_keys_are_read() {
        let env: Env = from_iter(vars(&[
            ("server_api_port", "not-a-port"),
            ("SEED_OVERRIDE", "nan"),
            ("CORS_ALLOW_ORIGINS", " , "),
        ]))
        .unwrap();

        assert_eq!(env.server_api_port, 5000);
        assert_eq!(env.seed, 42);
        assert!(env.cors_allow_origins.is_empty());
    }

    #[test]
    fn test_blank_endpoint_disables_export() {
        let env: Env = from_iter(vars(&[("OTEL_EXPORTER_OTLP_ENDPOINT", "  ")])).unwrap();
        assert_eq!(env.otel_endpoint(), None);
    }

    #[test]
    fn test_malformed_port_rejected() {
        let err = from_iter::<_, Env>(vars(&[("SERVER_API_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, EnvErr::Custom(msg) if msg.contains("SERVER_API_PORT")));
    }

    #[test]
    fn test_missing_required_field() {
        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        struct Required {
            #[allow(dead_code)]
            api_key: String,
        }

        let err = from_iter::<_, Required>(vars(&[])).unwrap_err();
        assert!(matches!(err, EnvErr::MissingValue("API_KEY")));
    }
}
