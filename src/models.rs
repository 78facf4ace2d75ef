use serde::Deserialize;

/// Profile of the authenticated user, including the homes they can access.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Me {
    pub name: String,
    pub email: String,
    pub id: String,
    pub username: String,
    pub locale: String,
    pub homes: Vec<Home>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Home {
    pub id: i64,
    pub name: String,
}

/// A physical Tado device (bridge, thermostat, valve) inside a home.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Device {
    #[serde(rename = "deviceType")]
    pub device_type: String,
    #[serde(rename = "serialNo")]
    pub serial_no: String,
    #[serde(rename = "shortSerialNo")]
    pub short_serial_no: String,
    #[serde(rename = "currentFwVersion")]
    pub current_fw_version: String,
    #[serde(rename = "connectionState")]
    pub connection_state: ConnectionState,
    pub characteristics: Characteristics,
    #[serde(rename = "inPairingMode")]
    pub in_pairing_mode: Option<bool>,
    #[serde(rename = "mountingState")]
    pub mounting_state: Option<MountingState>,
    #[serde(rename = "mountingStateWithError")]
    pub mounting_state_with_error: Option<String>,
    #[serde(rename = "batteryState")]
    pub battery_state: Option<String>,
    pub orientation: Option<String>,
    #[serde(rename = "childLockEnabled")]
    pub child_lock_enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConnectionState {
    pub value: bool,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Characteristics {
    pub capabilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MountingState {
    pub value: String,
    pub timestamp: String,
}

/// A phone or tablet registered to the home for presence detection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MobileDevice {
    pub name: String,
    pub id: i64,
    #[serde(rename = "deviceMetadata")]
    pub device_metadata: DeviceMetadata,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceMetadata {
    pub platform: String,
    #[serde(rename = "osVersion")]
    pub os_version: String,
    pub model: String,
    pub locale: String,
}

/// A heating area within a home and the devices assigned to it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    #[serde(rename = "dateCreated")]
    pub date_created: String,
    #[serde(rename = "deviceTypes")]
    pub device_types: Vec<String>,
    pub devices: Vec<Device>,
    #[serde(rename = "reportAvailable")]
    pub report_available: bool,
    #[serde(rename = "showScheduleSetup")]
    pub show_schedule_setup: bool,
    #[serde(rename = "supportsDazzle")]
    pub supports_dazzle: bool,
    #[serde(rename = "dazzleEnabled")]
    pub dazzle_enabled: bool,
    #[serde(rename = "dazzleMode")]
    pub dazzle_mode: DazzleMode,
    #[serde(rename = "openWindowDetection")]
    pub open_window_detection: OpenWindowDetection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DazzleMode {
    pub supported: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpenWindowDetection {
    pub supported: bool,
    pub enabled: bool,
    #[serde(rename = "timeoutInSeconds")]
    pub timeout_in_seconds: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_me_parsing() {
        let json = r#"{
            "name": "John Doe",
            "email": "john.doe@example.com",
            "id": "5f1d3bcd8a604a0b8ae04aefd1b242f0",
            "username": "john.doe@example.com",
            "locale": "en_GB",
            "homes": [{"id": 42, "name": "Home"}]
        }"#;

        let me: Me = serde_json::from_str(json).unwrap();
        assert_eq!(me.name, "John Doe");
        assert_eq!(me.homes.len(), 1);
        assert_eq!(me.homes[0].id, 42);
    }

    #[test]
    fn test_me_parsing_with_empty_home_list() {
        let json = r#"{
            "name": "John Doe",
            "email": "john.doe@example.com",
            "id": "5f1d3bcd8a604a0b8ae04aefd1b242f0",
            "username": "john.doe@example.com",
            "locale": "en_GB",
            "homes": []
        }"#;

        let me: Me = serde_json::from_str(json).unwrap();
        assert!(me.homes.is_empty());
    }

    #[test]
    fn test_device_parsing_without_optional_fields() {
        // Bridges report neither mounting nor battery state
        let json = r#"{
            "deviceType": "IB01",
            "serialNo": "IB1234567890",
            "shortSerialNo": "IB1234567890",
            "currentFwVersion": "49.4",
            "connectionState": {"value": true, "timestamp": "2024-03-01T10:12:32.000Z"},
            "characteristics": {"capabilities": []}
        }"#;

        let device: Device = serde_json::from_str(json).unwrap();
        assert_eq!(device.device_type, "IB01");
        assert!(device.connection_state.value);
        assert!(device.mounting_state.is_none());
        assert!(device.battery_state.is_none());
    }

    #[test]
    fn test_device_parsing_with_optional_fields() {
        let json = r#"{
            "deviceType": "VA02",
            "serialNo": "VA9876543210",
            "shortSerialNo": "VA9876543210",
            "currentFwVersion": "54.20",
            "connectionState": {"value": false, "timestamp": "2024-03-01T10:14:01.000Z"},
            "characteristics": {"capabilities": ["INSIDE_TEMPERATURE_MEASUREMENT"]},
            "inPairingMode": false,
            "mountingState": {"value": "CALIBRATED", "timestamp": "2024-02-11T09:06:41.000Z"},
            "mountingStateWithError": "CALIBRATED",
            "batteryState": "NORMAL",
            "orientation": "HORIZONTAL",
            "childLockEnabled": false
        }"#;

        let device: Device = serde_json::from_str(json).unwrap();
        assert_eq!(device.battery_state.as_deref(), Some("NORMAL"));
        assert_eq!(
            device.mounting_state.as_ref().map(|m| m.value.as_str()),
            Some("CALIBRATED")
        );
        assert_eq!(device.child_lock_enabled, Some(false));
    }

    #[test]
    fn test_mobile_device_parsing() {
        let json = r#"{
            "name": "John's Phone",
            "id": 123456,
            "deviceMetadata": {
                "platform": "iOS",
                "osVersion": "17.3",
                "model": "iPhone15,2",
                "locale": "en"
            }
        }"#;

        let mobile_device: MobileDevice = serde_json::from_str(json).unwrap();
        assert_eq!(mobile_device.id, 123456);
        assert_eq!(mobile_device.device_metadata.platform, "iOS");
    }
}
