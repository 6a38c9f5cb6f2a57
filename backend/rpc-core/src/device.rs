//! Device-status reporting boundary.
//!
//! The readings come from an external sensor collaborator; this module only
//! owns the RPC shape. `report_device_status` is fire-and-forget - the one
//! coupling back into this core is that a non-success reply makes
//! [`crate::rpc_client::RpcClient::report_device_status`] return `false`,
//! which the external scheduler uses to suppress its screen-off omission
//! and retry promptly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeviceStatus {
    pub on_ac_power: bool,
    /// Legacy field; chargers that report as USB still count as AC for the
    /// client's on-power rules.
    pub on_usb_power: bool,
    pub battery_charge_pct: f64,
    pub battery_temperature_celsius: f64,
    pub wifi_online: bool,
    pub user_active: bool,
}

impl DeviceStatus {
    pub(crate) fn request_body(&self) -> String {
        format!(
            "<report_device_status>\n<device_status>\n  <on_ac_power>{}</on_ac_power>\n  <on_usb_power>{}</on_usb_power>\n  <battery_charge_pct>{}</battery_charge_pct>\n  <battery_temperature_celsius>{}</battery_temperature_celsius>\n  <wifi_online>{}</wifi_online>\n  <user_active>{}</user_active>\n</device_status>\n</report_device_status>\n",
            wire_bool(self.on_ac_power),
            wire_bool(self.on_usb_power),
            self.battery_charge_pct,
            self.battery_temperature_celsius,
            wire_bool(self.wifi_online),
            wire_bool(self.user_active),
        )
    }
}

fn wire_bool(value: bool) -> i32 {
    i32::from(value)
}
