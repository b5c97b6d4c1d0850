//! Userspace mirror of the kernel's `linux/hiddev.h` interface.
//!
//! Only the structures and ioctls the driver needs are declared. Layouts
//! match the kernel ABI; the ioctl request numbers are derived from the
//! struct sizes by the `nix` macros, the same way the kernel header derives
//! them with `_IOR`/`_IOW`/`_IOWR`.

use nix::{ioctl_read, ioctl_readwrite, ioctl_write_ptr};

/// `HID_REPORT_TYPE_FEATURE`.
pub const HID_REPORT_TYPE_FEATURE: u32 = 3;

/// `HID_MAX_MULTI_USAGES`: capacity of the multi-usage transfer buffer.
pub const HID_MAX_MULTI_USAGES: usize = 1024;

/// `struct hiddev_devinfo`.
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct HiddevDevinfo {
    pub bustype: u32,
    pub busnum: u32,
    pub devnum: u32,
    pub ifnum: u32,
    pub vendor: i16,
    pub product: i16,
    pub version: i16,
    pub num_applications: u32,
}

/// `struct hiddev_report_info`.
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct HiddevReportInfo {
    pub report_type: u32,
    pub report_id: u32,
    pub num_fields: u32,
}

/// `struct hiddev_field_info`.
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct HiddevFieldInfo {
    pub report_type: u32,
    pub report_id: u32,
    pub field_index: u32,
    pub maxusage: u32,
    pub flags: u32,
    pub physical: u32,
    pub logical: u32,
    pub application: u32,
    pub logical_minimum: i32,
    pub logical_maximum: i32,
    pub physical_minimum: i32,
    pub physical_maximum: i32,
    pub unit_exponent: u32,
    pub unit: u32,
}

/// `struct hiddev_usage_ref`.
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct HiddevUsageRef {
    pub report_type: u32,
    pub report_id: u32,
    pub field_index: u32,
    pub usage_index: u32,
    pub usage_code: u32,
    pub value: i32,
}

/// `struct hiddev_usage_ref_multi`.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct HiddevUsageRefMulti {
    pub uref: HiddevUsageRef,
    pub num_values: u32,
    pub values: [i32; HID_MAX_MULTI_USAGES],
}

impl Default for HiddevUsageRefMulti {
    fn default() -> Self {
        Self {
            uref: HiddevUsageRef::default(),
            num_values: 0,
            values: [0; HID_MAX_MULTI_USAGES],
        }
    }
}

// HIDIOCGDEVINFO
ioctl_read!(hiddev_gdevinfo, b'H', 0x03, HiddevDevinfo);
// HIDIOCGREPORT (write direction: the kernel fetches the report the caller names)
ioctl_write_ptr!(hiddev_greport, b'H', 0x07, HiddevReportInfo);
// HIDIOCSREPORT
ioctl_write_ptr!(hiddev_sreport, b'H', 0x08, HiddevReportInfo);
// HIDIOCGFIELDINFO
ioctl_readwrite!(hiddev_gfieldinfo, b'H', 0x0a, HiddevFieldInfo);
// HIDIOCGUSAGES
ioctl_readwrite!(hiddev_gusages, b'H', 0x13, HiddevUsageRefMulti);
// HIDIOCSUSAGES
ioctl_write_ptr!(hiddev_susages, b'H', 0x14, HiddevUsageRefMulti);
