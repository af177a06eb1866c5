use leptos::prelude::*;

use super::layout::{PageSection, ScaledFrame};
use crate::nav::Section;

#[component]
pub fn Hero(section: Section) -> impl IntoView {
    view! {
        <PageSection section>
            <ScaledFrame>
                <div class="flex h-full flex-col items-center justify-center gap-8 text-center">
                    <p class="text-4xl text-muted">"Hi, I'm"</p>
                    <h1 class="text-9xl font-bold">"Jordan Reyes"</h1>
                    <p class="text-5xl text-cyan">"Systems & Web Engineer"</p>
                    <p class="max-w-5xl text-3xl leading-relaxed">
                        "I build fast, reliable software: from storage engines and network services to the interfaces people actually touch."
                    </p>
                    <p class="mt-12 text-2xl text-muted">
                        "Scroll, or use " <code>"↑"</code> " / " <code>"↓"</code> " to move between sections"
                    </p>
                </div>
            </ScaledFrame>
        </PageSection>
    }
}

#[component]
pub fn About(section: Section) -> impl IntoView {
    view! {
        <PageSection section>
            <ScaledFrame>
                <div class="grid h-full grid-cols-2 items-center gap-24 px-48">
                    <div>
                        <h2 class="mb-12 text-6xl font-bold">"About"</h2>
                        <p class="mb-8 text-3xl leading-relaxed">
                            "Ten years of shipping production systems, most recently leading a platform team responsible for "
                            <strong>"low-latency data pipelines"</strong>
                            " serving millions of requests a day."
                        </p>
                        <p class="mb-8 text-3xl leading-relaxed">
                            "I care about clear interfaces, honest measurements and code that the next person can read."
                        </p>
                    </div>
                    <div class="rounded-lg border-l-8 border-purple bg-brightBlack/30 p-12">
                        <p class="mb-6 text-3xl font-medium text-green">"What I enjoy:"</p>
                        <ul class="space-y-4 text-2xl">
                            <li>"Turning vague requirements into small, sharp tools"</li>
                            <li>"Profiling until the flame graph is boring"</li>
                            <li>"Mentoring engineers through their first big design"</li>
                            <li>"Bouldering, film photography and too much coffee"</li>
                        </ul>
                    </div>
                </div>
            </ScaledFrame>
        </PageSection>
    }
}
