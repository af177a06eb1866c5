use leptos::prelude::*;

use super::layout::PageSection;
use crate::nav::Section;

const CONTACT_EMAIL: &str = "hello@jordanreyes.dev";

#[component]
pub fn Footer(section: Section) -> impl IntoView {
    let built = env!("BUILD_TIME");
    let built_date = built.split('T').next().unwrap_or(built);

    view! {
        <PageSection section>
            <div class="mx-auto w-full max-w-2xl px-6 text-center">
                <h2 class="my-8 text-3xl font-bold">"Let's Connect"</h2>
                <div class="rounded-lg border border-muted/30 bg-brightBlack/30 p-6">
                    <p class="mb-4 text-lg font-medium text-cyan">
                        "Open to interesting problems and good conversations"
                    </p>
                    <div class="mt-6 flex flex-col items-center justify-center gap-4 sm:flex-row">
                        <a
                            href=format!("mailto:{CONTACT_EMAIL}")
                            class="rounded-md border border-cyan/30 bg-cyan/20 px-6 py-3 font-medium text-cyan transition-all duration-200 hover:bg-cyan/30"
                        >
                            {CONTACT_EMAIL}
                        </a>
                        <div class="flex gap-3">
                            <a
                                href="https://github.com/jordanreyes"
                                target="_blank"
                                rel="noopener noreferrer"
                                class="text-2xl text-white hover:text-brightWhite"
                                aria-label="GitHub Profile"
                            >
                                <i class="devicon-github-plain"></i>
                            </a>
                            <a
                                href="https://linkedin.com/in/jordanreyes"
                                target="_blank"
                                rel="noopener noreferrer"
                                class="text-2xl text-blue hover:text-brightBlue"
                                aria-label="LinkedIn Profile"
                            >
                                <i class="devicon-linkedin-plain"></i>
                            </a>
                        </div>
                    </div>
                </div>
                <footer class="mt-12 text-sm text-muted">
                    "Built with Leptos · last deployed " {built_date}
                </footer>
            </div>
        </PageSection>
    }
}
