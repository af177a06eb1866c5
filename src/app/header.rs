use leptos::{html, prelude::*};
use leptos_use::{use_scroll, UseScrollReturn};

use crate::nav::Section;

/// Scroll offset past which the header switches to its solid background.
const HEADER_SOLID_AFTER_PX: f64 = 50.0;

fn header_class(solid: bool) -> &'static str {
    if solid {
        "fixed top-0 inset-x-0 z-30 bg-background/95 shadow-lg backdrop-blur-sm transition-colors duration-300"
    } else {
        "fixed top-0 inset-x-0 z-30 bg-transparent transition-colors duration-300"
    }
}

#[component]
pub fn Header(container: NodeRef<html::Main>, sections: &'static [Section]) -> impl IntoView {
    let UseScrollReturn { y, .. } = use_scroll(container);
    let solid = Memo::new(move |_| y.get() > HEADER_SOLID_AFTER_PX);

    view! {
        <header class=move || header_class(solid.get())>
            <div class="mx-auto px-4 sm:px-6 lg:px-8 py-4 flex flex-wrap items-center justify-between">
                <a href="#home" class="text-2xl font-bold">
                    <span class="text-green">"➜"</span>
                    " "
                    <span class="text-cyan">"jordanreyes.dev"</span>
                </a>
                <nav class="hidden md:flex gap-6">
                    {sections
                        .iter()
                        .map(|s| {
                            view! {
                                <a
                                    href=format!("#{}", s.id)
                                    class="text-foreground hover:text-cyan transition-colors duration-200"
                                >
                                    {s.label}
                                </a>
                            }
                        })
                        .collect_view()}
                </nav>
            </div>
        </header>
    }
}
