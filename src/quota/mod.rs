//! Resource quota usage calculation

pub mod quantity;
pub mod usage;

pub use quantity::convert_to_base_value;
pub use usage::{
    GaugeLevel, QuotaGauge, QuotaScope, QuotaType, ResourceUsage, UsageBucket,
    get_resource_usage, has_compute_resources, quota_gauges, quota_resource_types, quota_scopes,
    quota_type, quota_usage_rows,
};
