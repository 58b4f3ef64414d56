// handlers/mod.rs - one module per resource, plus the shared pieces
//
// resource.rs holds the generic owner-scoped CRUD handlers; schedules, tasks,
// skills and exam routines are pure instantiations of it. Posts, saved posts
// and transactions keep the route shapes their clients already use.

pub mod exam_routines;
pub mod posts;
pub mod resource;
pub mod root;
pub mod saved_posts;
pub mod schedules;
pub mod skills;
pub mod tasks;
pub mod transactions;
pub mod utils;
