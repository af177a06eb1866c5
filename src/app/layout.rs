use leptos::prelude::*;
use leptos_use::{use_window_size, UseWindowSizeReturn};

use crate::{
    nav::Section,
    scale::{scale_factor, Resolution, REFERENCE_RESOLUTION},
};

/// Class every navigable section carries; the tracker finds sections by it.
pub const SECTION_CLASS: &str = "portfolio-section";

/// Scale factor for `base`, following the window size for as long as the
/// calling component lives.
pub fn use_layout_scale(base: Resolution) -> Signal<f64> {
    let UseWindowSizeReturn { width, height } = use_window_size();
    Signal::derive(move || {
        let scale = scale_factor(width.get(), height.get(), base);
        // window size is unknown while rendering on the server
        if scale.is_finite() {
            scale
        } else {
            1.0
        }
    })
}

#[component]
pub fn PageSection(section: Section, children: Children) -> impl IntoView {
    view! {
        <section
            id=section.id
            data-index=section.index.to_string()
            aria-label=section.label
            class=format!(
                "{SECTION_CLASS} relative min-h-screen w-full snap-start flex flex-col justify-center",
            )
        >
            {children()}
        </section>
    }
}

/// Lays children out on a fixed `base`-sized canvas and scales it uniformly to the viewport.
#[component]
pub fn ScaledFrame(
    #[prop(default = REFERENCE_RESOLUTION)] base: Resolution,
    children: Children,
) -> impl IntoView {
    let scale = use_layout_scale(base);
    view! {
        <div class="relative h-screen w-full overflow-hidden flex items-center justify-center">
            <div
                class="shrink-0 origin-center"
                style:width=format!("{}px", base.width)
                style:height=format!("{}px", base.height)
                style:transform=move || format!("scale({})", scale.get())
            >
                {children()}
            </div>
        </div>
    }
}
