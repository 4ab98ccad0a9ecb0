// In-memory reference data joined against incoming events

use std::collections::HashMap;

use crate::entities::Device;

/// Devices and RFID tag labels known to the bridge. Rebuilt wholesale at the
/// start of every connection; read concurrently by in-flight enrichments.
/// A lookup miss is normal and degrades to an absent name downstream.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    devices: HashMap<String, Device>,
    tags: HashMap<String, Option<String>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.devices.clear();
        self.tags.clear();
    }

    pub fn insert_device(&mut self, device: Device) {
        self.devices.insert(device.device_id.clone(), device);
    }

    /// First-seen wins: a code already cached (likely reported by another
    /// device) keeps its original label. Returns whether the tag was added.
    pub fn insert_tag(&mut self, code: String, label: Option<String>) -> bool {
        if self.tags.contains_key(&code) {
            return false;
        }
        self.tags.insert(code, label);
        true
    }

    pub fn contains_tag(&self, code: &str) -> bool {
        self.tags.contains_key(code)
    }

    pub fn lookup_device(&self, device_id: &str) -> Option<&Device> {
        self.devices.get(device_id)
    }

    pub fn lookup_tag(&self, code: &str) -> Option<&str> {
        self.tags.get(code).and_then(|label| label.as_deref())
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }
}
