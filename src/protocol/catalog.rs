//! Every external command the API accepts.
//!
//! Field lists follow the Nagios external command reference; order matters
//! because it is the order fields appear on the wire.

use super::descriptor::{CommandSpec, FieldKind, FieldSpec, Rule, Trailer};

const HOSTNAME: FieldSpec = FieldSpec::required("hostname", FieldKind::Text);
const HOSTGROUP: FieldSpec = FieldSpec::required("hostgroup", FieldKind::Text);
const SERVICE_DESCRIPTION: FieldSpec = FieldSpec::required("service_description", FieldKind::Text);
const AUTHOR: FieldSpec = FieldSpec::required("author", FieldKind::Text);
const COMMENT: FieldSpec = FieldSpec::required("comment", FieldKind::Text);
const COMMENT_ID: FieldSpec = FieldSpec::required("comment_id", FieldKind::Identifier);
const STICKY: FieldSpec = FieldSpec::defaulted("sticky", FieldKind::Flag, 2);
const NOTIFY: FieldSpec = FieldSpec::defaulted("notify", FieldKind::Flag, 1);
const PERSISTENT: FieldSpec = FieldSpec::defaulted("persistent", FieldKind::Flag, 1);

const HOST_FIELDS: &[FieldSpec] = &[HOSTNAME];
const HOSTGROUP_FIELDS: &[FieldSpec] = &[HOSTGROUP];
const COMMENT_ID_FIELDS: &[FieldSpec] = &[COMMENT_ID];
const HOST_SERVICE_FIELDS: &[FieldSpec] = &[HOSTNAME, SERVICE_DESCRIPTION];

const ACKNOWLEDGE_HOST_FIELDS: &[FieldSpec] = &[
    HOSTNAME,
    STICKY,
    NOTIFY,
    PERSISTENT,
    AUTHOR,
    FieldSpec::optional_text("comment"),
];

const ACKNOWLEDGE_SVC_FIELDS: &[FieldSpec] = &[
    HOSTNAME,
    SERVICE_DESCRIPTION,
    STICKY,
    NOTIFY,
    PERSISTENT,
    FieldSpec::optional_text("author"),
    FieldSpec::optional_text("comment"),
];

const ADD_HOST_COMMENT_FIELDS: &[FieldSpec] = &[HOSTNAME, PERSISTENT, AUTHOR, COMMENT];

const ADD_SVC_COMMENT_FIELDS: &[FieldSpec] = &[
    HOSTNAME,
    FieldSpec::required("service", FieldKind::Text).with_aliases(&["service_description"]),
    PERSISTENT,
    AUTHOR,
    COMMENT,
];

const HOST_DOWNTIME_FIELDS: &[FieldSpec] = &[
    HOSTNAME,
    FieldSpec::required("start_time", FieldKind::Integer),
    FieldSpec::required("end_time", FieldKind::Integer),
    FieldSpec::defaulted("fixed", FieldKind::Flag, 0),
    FieldSpec::defaulted("trigger_id", FieldKind::Integer, 0),
    FieldSpec::required("duration", FieldKind::Integer),
    AUTHOR,
    COMMENT,
];

const HOST_DOWNTIME_RULES: &[Rule] = &[
    Rule::Before {
        earlier: "start_time",
        later: "end_time",
    },
    Rule::Positive("duration"),
];

const fn command(name: &'static str, summary: &'static str, fields: &'static [FieldSpec]) -> CommandSpec {
    CommandSpec {
        name,
        summary,
        fields,
        rules: &[],
        trailer: Trailer::None,
    }
}

const fn scheduled_check(
    name: &'static str,
    summary: &'static str,
    fields: &'static [FieldSpec],
) -> CommandSpec {
    CommandSpec {
        trailer: Trailer::CheckTime,
        ..command(name, summary, fields)
    }
}

static CATALOG: &[CommandSpec] = &[
    command(
        "ACKNOWLEDGE_HOST_PROBLEM",
        "Acknowledge the current problem of a host",
        ACKNOWLEDGE_HOST_FIELDS,
    ),
    command(
        "ACKNOWLEDGE_SVC_PROBLEM",
        "Acknowledge the current problem of a service",
        ACKNOWLEDGE_SVC_FIELDS,
    ),
    command("ADD_HOST_COMMENT", "Add a comment to a host", ADD_HOST_COMMENT_FIELDS),
    command("ADD_SVC_COMMENT", "Add a comment to a service", ADD_SVC_COMMENT_FIELDS),
    command(
        "DEL_ALL_HOST_COMMENTS",
        "Delete every comment on a host",
        HOST_FIELDS,
    ),
    command(
        "DEL_ALL_SVC_COMMENTS",
        "Delete every service comment on a host",
        HOST_FIELDS,
    ),
    command("DEL_HOST_COMMENT", "Delete a host comment by id", COMMENT_ID_FIELDS),
    command("DEL_SVC_COMMENT", "Delete a service comment by id", COMMENT_ID_FIELDS),
    command(
        "DISABLE_ALL_NOTIFICATIONS_BEYOND_HOST",
        "Disable notifications for everything beyond a host",
        HOST_FIELDS,
    ),
    command(
        "ENABLE_ALL_NOTIFICATIONS_BEYOND_HOST",
        "Enable notifications for everything beyond a host",
        HOST_FIELDS,
    ),
    command(
        "DISABLE_HOSTGROUP_HOST_CHECKS",
        "Disable active checks of every host in a hostgroup",
        HOSTGROUP_FIELDS,
    ),
    command(
        "ENABLE_HOSTGROUP_HOST_CHECKS",
        "Enable active checks of every host in a hostgroup",
        HOSTGROUP_FIELDS,
    ),
    command(
        "DISABLE_HOSTGROUP_HOST_NOTIFICATIONS",
        "Disable notifications for every host in a hostgroup",
        HOSTGROUP_FIELDS,
    ),
    command(
        "ENABLE_HOSTGROUP_HOST_NOTIFICATIONS",
        "Enable notifications for every host in a hostgroup",
        HOSTGROUP_FIELDS,
    ),
    command(
        "DISABLE_HOSTGROUP_SVC_CHECKS",
        "Disable active checks of every service in a hostgroup",
        HOSTGROUP_FIELDS,
    ),
    command(
        "ENABLE_HOSTGROUP_SVC_CHECKS",
        "Enable active checks of every service in a hostgroup",
        HOSTGROUP_FIELDS,
    ),
    command(
        "DISABLE_HOSTGROUP_SVC_NOTIFICATIONS",
        "Disable notifications for every service in a hostgroup",
        HOSTGROUP_FIELDS,
    ),
    command(
        "ENABLE_HOSTGROUP_SVC_NOTIFICATIONS",
        "Enable notifications for every service in a hostgroup",
        HOSTGROUP_FIELDS,
    ),
    command(
        "DISABLE_HOST_AND_CHILD_NOTIFICATIONS",
        "Disable notifications for a host and its children",
        HOST_FIELDS,
    ),
    command(
        "ENABLE_HOST_AND_CHILD_NOTIFICATIONS",
        "Enable notifications for a host and its children",
        HOST_FIELDS,
    ),
    command("DISABLE_HOST_CHECK", "Disable active checks of a host", HOST_FIELDS),
    command("ENABLE_HOST_CHECK", "Enable active checks of a host", HOST_FIELDS),
    command(
        "DISABLE_HOST_NOTIFICATIONS",
        "Disable notifications for a host",
        HOST_FIELDS,
    ),
    command(
        "ENABLE_HOST_NOTIFICATIONS",
        "Enable notifications for a host",
        HOST_FIELDS,
    ),
    command(
        "DISABLE_NOTIFICATIONS",
        "Disable notifications program-wide",
        &[],
    ),
    command("ENABLE_NOTIFICATIONS", "Enable notifications program-wide", &[]),
    scheduled_check(
        "SCHEDULE_FORCED_HOST_CHECK",
        "Force an immediate check of a host",
        HOST_FIELDS,
    ),
    scheduled_check(
        "SCHEDULE_FORCED_HOST_SVC_CHECKS",
        "Force an immediate check of every service on a host",
        HOST_FIELDS,
    ),
    scheduled_check(
        "SCHEDULE_FORCED_SVC_CHECK",
        "Force an immediate check of a service",
        HOST_SERVICE_FIELDS,
    ),
    scheduled_check(
        "SCHEDULE_HOST_CHECK",
        "Schedule a check of a host",
        HOST_FIELDS,
    ),
    CommandSpec {
        rules: HOST_DOWNTIME_RULES,
        ..command(
            "SCHEDULE_HOST_DOWNTIME",
            "Schedule downtime for a host",
            HOST_DOWNTIME_FIELDS,
        )
    },
];

/// All supported commands, in listing order.
pub fn all() -> &'static [CommandSpec] {
    CATALOG
}

/// Look a command up by protocol name or route, ignoring case.
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    let name = name.trim_start_matches('/');
    CATALOG
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
}
