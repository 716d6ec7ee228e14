//! Shared constants (schema limits, replication groups).

// -------- Indexes --------
/// Highest index id a space may carry. The index map of a space (and of its
/// read views) holds at most INDEX_ID_MAX + 1 slots.
pub const INDEX_ID_MAX: u32 = 127;

// -------- Replication groups --------
/// Default replication group.
pub const GROUP_DEFAULT: u32 = 0;
/// Group for spaces that are local to one instance (not replicated).
pub const GROUP_LOCAL: u32 = 1;
