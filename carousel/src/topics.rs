//! Topic names published on the carousel's bus.

pub const MOUNT_BEFORE: &str = "mount.before";
pub const MOUNT_AFTER: &str = "mount.after";
pub const UPDATE: &str = "update";
pub const RESIZE: &str = "resize";
pub const DESTROY: &str = "destroy";

pub const RUN_BEFORE: &str = "run.before";
pub const RUN: &str = "run";
pub const RUN_START: &str = "run.start";
pub const RUN_END: &str = "run.end";
pub const RUN_OFFSET: &str = "run.offset";
pub const RUN_AFTER: &str = "run.after";

pub const MOVE: &str = "move";
pub const MOVE_AFTER: &str = "move.after";
pub const TRANSLATE_JUMP: &str = "translate.jump";
