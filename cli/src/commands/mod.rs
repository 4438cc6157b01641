mod activity;
mod goal;
mod helpers;
mod log;
mod maintain;
mod today;
mod weight;

pub(crate) use activity::{cmd_activity_correct, cmd_activity_log};
pub(crate) use goal::{cmd_goal_set, cmd_goal_show};
pub(crate) use log::{cmd_correct, cmd_log};
pub(crate) use maintain::cmd_maintain;
pub(crate) use today::{cmd_history, cmd_today};
pub(crate) use weight::{cmd_weight_history, cmd_weight_log, cmd_weight_show};
