//! Client profiles declared to the player endpoint.
//!
//! The remote API varies availability and completeness of its answer by the
//! client identity sent in `context.client`. Profiles are tried in a fixed
//! order, most permissive first.

use serde::Serialize;

/// Locale fields sent with every profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locale {
    /// Interface language (`hl`).
    pub hl: String,
    /// Content region (`gl`).
    pub gl: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            hl: "en".to_string(),
            gl: "US".to_string(),
        }
    }
}

/// An identity descriptor sent as part of each metadata request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProfile {
    /// Client name (`ANDROID`, `WEB`, `IOS`).
    pub name: String,
    /// Client version string.
    pub version: String,
    /// Numeric client id used by the `X-YouTube-Client-Name` header.
    pub name_id: u32,
    /// Device model, for mobile clients that declare one.
    pub device_model: Option<String>,
    /// Android SDK level, for the Android client.
    pub android_sdk_version: Option<u32>,
    /// UTC offset in minutes, when declared.
    pub utc_offset_minutes: Option<i32>,
    /// Language and region.
    pub locale: Locale,
}

/// Serialized form of a profile inside `context.client`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContext<'a> {
    client_name: &'a str,
    client_version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    android_sdk_version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_model: Option<&'a str>,
    hl: &'a str,
    gl: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    utc_offset_minutes: Option<i32>,
}

impl ClientProfile {
    /// The Android app client. Usually the least restricted.
    #[must_use]
    pub fn android() -> Self {
        Self {
            name: "ANDROID".to_string(),
            version: "19.09.36".to_string(),
            name_id: 3,
            device_model: None,
            android_sdk_version: Some(30),
            utc_offset_minutes: Some(0),
            locale: Locale::default(),
        }
    }

    /// The desktop web client.
    #[must_use]
    pub fn web() -> Self {
        Self {
            name: "WEB".to_string(),
            version: "2.20240201.00.00".to_string(),
            name_id: 1,
            device_model: None,
            android_sdk_version: None,
            utc_offset_minutes: None,
            locale: Locale::default(),
        }
    }

    /// The iOS app client.
    #[must_use]
    pub fn ios() -> Self {
        Self {
            name: "IOS".to_string(),
            version: "19.09.3".to_string(),
            name_id: 5,
            device_model: Some("iPhone14,3".to_string()),
            android_sdk_version: None,
            utc_offset_minutes: None,
            locale: Locale::default(),
        }
    }

    /// Returns the `context.client` object for this profile.
    #[must_use]
    pub fn client_context(&self) -> ClientContext<'_> {
        ClientContext {
            client_name: &self.name,
            client_version: &self.version,
            android_sdk_version: self.android_sdk_version,
            device_model: self.device_model.as_deref(),
            hl: &self.locale.hl,
            gl: &self.locale.gl,
            utc_offset_minutes: self.utc_offset_minutes,
        }
    }
}

/// Returns the fixed profile order: primary first, fallbacks after.
#[must_use]
pub fn default_profiles() -> Vec<ClientProfile> {
    vec![
        ClientProfile::android(),
        ClientProfile::web(),
        ClientProfile::ios(),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles_order_primary_first() {
        let names: Vec<String> = default_profiles().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["ANDROID", "WEB", "IOS"]);
    }

    #[test]
    fn test_android_context_includes_sdk_version() {
        let profile = ClientProfile::android();
        let value = serde_json::to_value(profile.client_context()).unwrap();
        assert_eq!(value["clientName"], "ANDROID");
        assert_eq!(value["clientVersion"], "19.09.36");
        assert_eq!(value["androidSdkVersion"], 30);
        assert_eq!(value["utcOffsetMinutes"], 0);
        assert_eq!(value["hl"], "en");
        assert_eq!(value["gl"], "US");
        assert!(value.get("deviceModel").is_none());
    }

    #[test]
    fn test_ios_context_includes_device_model_only() {
        let profile = ClientProfile::ios();
        let value = serde_json::to_value(profile.client_context()).unwrap();
        assert_eq!(value["deviceModel"], "iPhone14,3");
        assert!(value.get("androidSdkVersion").is_none());
        assert!(value.get("utcOffsetMinutes").is_none());
    }
}
