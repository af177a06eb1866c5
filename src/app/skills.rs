use leptos::prelude::*;

use super::layout::PageSection;
use crate::nav::Section;

struct SkillGroup {
    title: &'static str,
    items: &'static [&'static str],
}

static SKILL_GROUPS: [SkillGroup; 4] = [
    SkillGroup {
        title: "Languages",
        items: &["Rust", "Go", "TypeScript", "Python", "SQL"],
    },
    SkillGroup {
        title: "Backend",
        items: &["Axum", "Tokio", "PostgreSQL", "Redis", "gRPC"],
    },
    SkillGroup {
        title: "Frontend",
        items: &["Leptos", "WebAssembly", "React", "Tailwind CSS"],
    },
    SkillGroup {
        title: "Infrastructure",
        items: &["Kubernetes", "Terraform", "AWS", "GitHub Actions", "Nix"],
    },
];

struct Project {
    name: &'static str,
    description: &'static str,
    tags: &'static [&'static str],
    href: &'static str,
}

static PROJECTS: [Project; 3] = [
    Project {
        name: "tidepool",
        description: "An embedded time-series store with compressed column blocks and a tiny query language.",
        tags: &["Rust", "storage"],
        href: "https://github.com/jordanreyes/tidepool",
    },
    Project {
        name: "relay-mesh",
        description: "A sidecar that batches and retries webhook deliveries with per-tenant rate limits.",
        tags: &["Go", "networking"],
        href: "https://github.com/jordanreyes/relay-mesh",
    },
    Project {
        name: "this site",
        description: "Server-rendered Leptos with hydration, scroll-synced navigation and a build-time image compressor.",
        tags: &["Rust", "WASM"],
        href: "https://github.com/jordanreyes/portfolio-site",
    },
];

#[component]
pub fn Skills(section: Section) -> impl IntoView {
    view! {
        <PageSection section>
            <div class="mx-auto w-full max-w-5xl px-6">
                <h2 class="my-8 text-3xl font-bold">"Skills"</h2>
                <div class="grid grid-cols-1 gap-6 sm:grid-cols-2">
                    {SKILL_GROUPS
                        .iter()
                        .map(|group| {
                            view! {
                                <div class="rounded-md border border-muted/30 bg-brightBlack/20 p-4">
                                    <h3 class="mb-3 font-bold text-cyan">{group.title}</h3>
                                    <div class="flex flex-wrap gap-2">
                                        {group
                                            .items
                                            .iter()
                                            .map(|s| {
                                                view! {
                                                    <span class="rounded-md bg-brightBlack px-2 py-1 text-sm">
                                                        {*s}
                                                    </span>
                                                }
                                            })
                                            .collect_view()}
                                    </div>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
        </PageSection>
    }
}

#[component]
pub fn Projects(section: Section) -> impl IntoView {
    view! {
        <PageSection section>
            <div class="mx-auto w-full max-w-5xl px-6">
                <h2 class="my-8 text-3xl font-bold">"Projects"</h2>
                <div class="space-y-4">
                    {PROJECTS
                        .iter()
                        .map(|p| {
                            view! {
                                <a
                                    href=p.href
                                    target="_blank"
                                    rel="noopener noreferrer"
                                    class="block rounded-md p-4 transition-colors duration-200 hover:bg-brightBlack/20"
                                >
                                    <div class="text-lg font-medium text-blue">{p.name}</div>
                                    <p class="mt-1">{p.description}</p>
                                    <div class="mt-2">
                                        {p
                                            .tags
                                            .iter()
                                            .map(|t| {
                                                view! {
                                                    <span class="mr-2 rounded-md bg-green/20 px-2 py-1 text-xs text-green">
                                                        {*t}
                                                    </span>
                                                }
                                            })
                                            .collect_view()}
                                    </div>
                                </a>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
        </PageSection>
    }
}
