//! Flavors
//!
//! Records are compute flavor objects. Sizes are plain integers (RAM in
//! MiB, disks in GiB), so flavors are the resource the integer presets are
//! most useful for.

use oq_core::{PropEnum, QueryResult};
use oq_queries::handlers::{
    single_filter, ClientSideHandler, PropSupport, ServerSideFilterFunc, ServerSideFilters,
    ServerSideHandler,
};
use oq_queries::params::FilterParams;
use oq_queries::presets::{PresetCategory, QueryPresets};
use oq_queries::props::{PropFunc, PropHandler};
use oq_queries::QueryMapping;
use serde_json::Value;

use crate::record::{field, forward_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlavorProperties {
    FlavorDescription,
    FlavorDisk,
    FlavorEphemeral,
    FlavorId,
    FlavorIsDisabled,
    FlavorIsPublic,
    FlavorName,
    FlavorRam,
    FlavorSwap,
    FlavorVcpu,
}

impl PropEnum for FlavorProperties {
    fn all() -> &'static [Self] {
        &[
            Self::FlavorDescription,
            Self::FlavorDisk,
            Self::FlavorEphemeral,
            Self::FlavorId,
            Self::FlavorIsDisabled,
            Self::FlavorIsPublic,
            Self::FlavorName,
            Self::FlavorRam,
            Self::FlavorSwap,
            Self::FlavorVcpu,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            Self::FlavorDescription => "FLAVOR_DESCRIPTION",
            Self::FlavorDisk => "FLAVOR_DISK",
            Self::FlavorEphemeral => "FLAVOR_EPHEMERAL",
            Self::FlavorId => "FLAVOR_ID",
            Self::FlavorIsDisabled => "FLAVOR_IS_DISABLED",
            Self::FlavorIsPublic => "FLAVOR_IS_PUBLIC",
            Self::FlavorName => "FLAVOR_NAME",
            Self::FlavorRam => "FLAVOR_RAM",
            Self::FlavorSwap => "FLAVOR_SWAP",
            Self::FlavorVcpu => "FLAVOR_VCPU",
        }
    }
}

impl FlavorProperties {
    pub fn prop_func(&self) -> PropFunc<Value> {
        match self {
            Self::FlavorDescription => |r| field(r, "description"),
            Self::FlavorDisk => |r| field(r, "disk"),
            Self::FlavorEphemeral => |r| field(r, "ephemeral"),
            Self::FlavorId => |r| field(r, "id"),
            Self::FlavorIsDisabled => |r| field(r, "is_disabled"),
            Self::FlavorIsPublic => |r| field(r, "is_public"),
            Self::FlavorName => |r| field(r, "name"),
            Self::FlavorRam => |r| field(r, "ram"),
            Self::FlavorSwap => |r| field(r, "swap"),
            Self::FlavorVcpu => |r| field(r, "vcpus"),
        }
    }

    const SIZES: &'static [FlavorProperties] = &[
        Self::FlavorDisk,
        Self::FlavorEphemeral,
        Self::FlavorRam,
        Self::FlavorSwap,
        Self::FlavorVcpu,
    ];
}

/// Lower bound for a `min*` listing parameter. `inclusive` is false for
/// strict comparisons, which bump whole numbers by one. Fractional bounds
/// round up either way.
fn lower_bound(params: &FilterParams, inclusive: bool) -> Option<i64> {
    let value = params.get("value")?.as_f64()?;
    let bound = if inclusive || value.fract() != 0.0 {
        value.ceil()
    } else {
        value + 1.0
    };
    Some(bound.max(0.0) as i64)
}

fn ram_greater_than(params: &FilterParams) -> Option<ServerSideFilters> {
    Some(single_filter("minRam", lower_bound(params, false)?))
}

fn ram_greater_than_or_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    Some(single_filter("minRam", lower_bound(params, true)?))
}

fn disk_greater_than(params: &FilterParams) -> Option<ServerSideFilters> {
    Some(single_filter("minDisk", lower_bound(params, false)?))
}

fn disk_greater_than_or_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    Some(single_filter("minDisk", lower_bound(params, true)?))
}

/// Only booleans can be pushed down
fn is_public_equal_to(params: &FilterParams) -> Option<ServerSideFilters> {
    params.get("value")?.as_bool()?;
    forward_value("is_public", params)
}

pub struct FlavorMapping;

impl QueryMapping for FlavorMapping {
    const RESOURCE: &'static str = "flavors";

    type Prop = FlavorProperties;
    type Record = Value;

    fn prop_mapping() -> QueryResult<PropHandler<FlavorProperties, Value>> {
        PropHandler::new(FlavorProperties::all().iter().map(|p| (*p, p.prop_func())))
    }

    fn client_side_handlers() -> QueryResult<Vec<ClientSideHandler<FlavorProperties>>> {
        let text = PropSupport::Props(vec![
            FlavorProperties::FlavorName,
            FlavorProperties::FlavorDescription,
        ]);
        let sizes = PropSupport::Props(FlavorProperties::SIZES.to_vec());

        Ok(vec![
            ClientSideHandler::generic(
                QueryPresets::in_category(PresetCategory::Generic)
                    .map(|preset| (preset, PropSupport::All)),
            )?,
            ClientSideHandler::string(
                QueryPresets::in_category(PresetCategory::String)
                    .map(|preset| (preset, text.clone())),
            )?,
            ClientSideHandler::integer(
                QueryPresets::in_category(PresetCategory::Integer)
                    .map(|preset| (preset, sizes.clone())),
            )?,
        ])
    }

    fn server_side_handler() -> ServerSideHandler<FlavorProperties> {
        ServerSideHandler::new(vec![
            (
                QueryPresets::GreaterThan,
                vec![
                    (FlavorProperties::FlavorRam, ram_greater_than as ServerSideFilterFunc),
                    (FlavorProperties::FlavorDisk, disk_greater_than as ServerSideFilterFunc),
                ],
            ),
            (
                QueryPresets::GreaterThanOrEqualTo,
                vec![
                    (
                        FlavorProperties::FlavorRam,
                        ram_greater_than_or_equal_to as ServerSideFilterFunc,
                    ),
                    (
                        FlavorProperties::FlavorDisk,
                        disk_greater_than_or_equal_to as ServerSideFilterFunc,
                    ),
                ],
            ),
            (
                QueryPresets::EqualTo,
                vec![(
                    FlavorProperties::FlavorIsPublic,
                    is_public_equal_to as ServerSideFilterFunc,
                )],
            ),
        ])
    }
}
