//! Resource catalog keyed by cohort group.
//!
//! Ordered for fixed-centroid clustering, where group 0 is the
//! lowest-performing profile and group 2 the highest.

use learnpath_core::ClusterId;

/// A recommended learning resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Display title
    pub title: &'static str,
    /// Link
    pub url: &'static str,
}

const FOUNDATIONS: &[Resource] = &[
    Resource { title: "Khan Academy Basics", url: "https://www.khanacademy.org" },
    Resource { title: "Math Antics", url: "https://mathantics.com" },
];

const PRACTICE: &[Resource] = &[
    Resource { title: "Brilliant Practice", url: "https://brilliant.org" },
    Resource { title: "IXL", url: "https://www.ixl.com" },
];

const ADVANCED: &[Resource] = &[
    Resource { title: "MIT OpenCourseWare", url: "https://ocw.mit.edu" },
    Resource { title: "Wolfram Alpha", url: "https://www.wolframalpha.com" },
];

/// Resources for a group; unknown groups have none.
pub fn resources_for(cluster: ClusterId) -> &'static [Resource] {
    match cluster.index() {
        0 => FOUNDATIONS,
        1 => PRACTICE,
        2 => ADVANCED,
        _ => &[],
    }
}
