//! Static site content: courses, labs, CTF listings, the roadmap and the
//! landing page.
//!
//! Content is compiled in and rebuilt on every call, the same way game
//! content is.

mod courses;
mod ctf;
mod labs;
mod landing;
mod roadmap;

pub use courses::{Course, CourseModule, Instructor, Interactive, ModuleActivity, courses, find_course};
pub use ctf::{ALL_CATEGORIES, CtfChallenge, ctf_categories, ctf_challenges, filter_ctf};
pub use labs::{Lab, LabChallenge, find_lab, labs};
pub use landing::{Feature, GameListing, HeroStat, Landing, game_listings, landing};
pub use roadmap::{
    Resource, RoadmapItem, RoadmapLevel, RoadmapSection, RoadmapTopic, filter_roadmap, find_item,
    item_points, roadmap, total_items,
};
