//! Static project catalog. Entries are defined in code and never mutated.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureBadge {
    pub label: &'static str,
    pub icon: &'static str,
}

/// Descriptor of one portfolio project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub id: &'static str,
    /// Shown on the home page when set.
    pub featured: bool,
    pub href: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub status: &'static str,
    pub border_accent: &'static str,
    pub bg_accent: &'static str,
    pub text_accent: &'static str,
    pub features: &'static [FeatureBadge],
}

/// Sidebar entry inside a project layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

pub const CAR_PRICE_ID: &str = "car-price";

static ALL_PROJECTS: &[ProjectInfo] = &[ProjectInfo {
    id: CAR_PRICE_ID,
    featured: true,
    href: "/projects/car-price",
    title: "Car Price Prediction & MLOps",
    description: "End-to-end machine learning system using CatBoost and MultiQuantile loss. \
                  This project is not just a model; it covers a complete MLOps cycle including \
                  data collection, cleaning, modeling, and real-time monitoring (Drift \
                  Detection). Users can examine the model's confidence intervals and Shapley \
                  values via the dashboard.",
    status: "LIVE DEMO",
    border_accent: "group-hover:border-blue-500/50 dark:group-hover:border-blue-400/50",
    bg_accent: "bg-blue-500",
    text_accent: "text-blue-600 dark:text-blue-400 bg-blue-50 dark:bg-blue-900/20 \
                  border-blue-200 dark:border-blue-800",
    features: &[
        FeatureBadge {
            label: "Analytics Dashboard",
            icon: "layout-dashboard",
        },
        FeatureBadge {
            label: "Price Prediction",
            icon: "brain-circuit",
        },
        FeatureBadge {
            label: "Drift Monitoring",
            icon: "activity",
        },
        FeatureBadge {
            label: "SHAP Explainability",
            icon: "code",
        },
    ],
}];

static CAR_PRICE_NAV: &[NavLink] = &[
    NavLink {
        href: "/projects/car-price/dashboard",
        label: "Dashboard",
        icon: "layout-dashboard",
    },
    NavLink {
        href: "/projects/car-price/predict",
        label: "Price Prediction",
        icon: "brain-circuit",
    },
    NavLink {
        href: "/projects/car-price/drift",
        label: "Drift",
        icon: "activity",
    },
    NavLink {
        href: "/projects/car-price/shap",
        label: "SHAP Analysis",
        icon: "pie-chart",
    },
    NavLink {
        href: "/projects/car-price/blog",
        label: "Project Blog",
        icon: "book-open",
    },
];

pub fn all_projects() -> &'static [ProjectInfo] {
    ALL_PROJECTS
}

pub fn featured_projects() -> impl Iterator<Item = &'static ProjectInfo> {
    ALL_PROJECTS.iter().filter(|project| project.featured)
}

pub fn project_by_id(id: &str) -> Option<&'static ProjectInfo> {
    ALL_PROJECTS.iter().find(|project| project.id == id)
}

/// Sidebar links for a project layout; empty for projects without sections.
pub fn project_nav(id: &str) -> &'static [NavLink] {
    match id {
        CAR_PRICE_ID => CAR_PRICE_NAV,
        _ => &[],
    }
}
