use std::sync::Arc;

use leptos::{ev, html, prelude::*};
use leptos_use::{use_event_listener, use_timeout_fn, use_window, UseTimeoutFnReturn};
use wasm_bindgen::JsValue;
use web_sys::{Element, ScrollBehavior, ScrollToOptions};

use super::layout::SECTION_CLASS;
use crate::nav::{
    active_from_ratios, scroll_progress, section_index_of, visible_ratio, NavCommand, NavState,
    ScrollDebounce, Section, SCROLL_IDLE_MS,
};

fn section_elements(container: &Element) -> Vec<Element> {
    let found = container.get_elements_by_class_name(SECTION_CLASS);
    (0..found.length()).filter_map(|i| found.item(i)).collect()
}

/// Swaps the location fragment without adding a history entry.
fn replace_fragment(id: &str) {
    let Ok(history) = window().history() else {
        return;
    };
    let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&format!("#{id}")));
}

fn marker_class(active: bool, scrolling: bool) -> &'static str {
    match (active, scrolling) {
        (true, _) => "block w-3 h-3 rounded-full bg-cyan scale-125 transition-all duration-200",
        (false, true) => {
            "block w-3 h-3 rounded-full bg-muted/60 scale-75 transition-all duration-200"
        }
        (false, false) => {
            "block w-3 h-3 rounded-full bg-muted/60 hover:bg-brightCyan transition-all duration-200"
        }
    }
}

/// Progress bar and section markers for the page's scroll container.
///
/// Everything here is inert until the container and its sections are in the DOM.
/// Listeners and the idle timer belong to this component's owner and go away with it.
#[component]
pub fn SectionNav(container: NodeRef<html::Main>, sections: &'static [Section]) -> impl IntoView {
    let state = RwSignal::new(NavState::new(sections.len()));
    let progress = RwSignal::new(0.0_f64);
    let debounce = RwSignal::new(ScrollDebounce::default());
    let scrolling = Memo::new(move |_| debounce.with(|d| d.is_scrolling()));

    let go_to = move |index: isize| {
        let Some(container) = container.get_untracked() else {
            return;
        };
        let mut next = state.get_untracked();
        let Some(index) = next.go_to(index) else {
            return;
        };
        let Some(target) = section_elements(&container).into_iter().nth(index) else {
            return;
        };
        let offset = target.get_bounding_client_rect().top()
            - container.get_bounding_client_rect().top();
        let opts = ScrollToOptions::new();
        opts.set_top(container.scroll_top() as f64 + offset);
        opts.set_behavior(ScrollBehavior::Smooth);
        container.scroll_to_with_scroll_to_options(&opts);
        state.set(next);
    };

    let refresh = move || {
        let Some(container) = container.get_untracked() else {
            return;
        };
        progress.set(scroll_progress(
            container.scroll_top() as f64,
            container.scroll_height() as f64,
            container.client_height() as f64,
        ));
        let viewport = container.client_height() as f64;
        let top = container.get_bounding_client_rect().top();
        let ratios = section_elements(&container)
            .iter()
            .map(|el| {
                let rect = el.get_bounding_client_rect();
                visible_ratio(rect.top() - top, rect.height(), viewport)
            })
            .collect::<Vec<_>>();
        if let Some(i) = active_from_ratios(&ratios) {
            if state.get_untracked().active() != i {
                state.update(|s| {
                    s.set_active(i);
                });
            }
        }
    };

    // the idle timer re-arms itself when it wakes before the quiet period is over
    let rearm = StoredValue::new(None::<Arc<dyn Fn() + Send + Sync>>);
    let UseTimeoutFnReturn { start, .. } = use_timeout_fn(
        move |_: ()| {
            let still_scrolling = debounce
                .try_update(|d| d.settle(js_sys::Date::now()))
                .unwrap_or(false);
            if still_scrolling {
                if let Some(rearm) = rearm.get_value() {
                    rearm();
                }
            }
        },
        SCROLL_IDLE_MS,
    );
    rearm.set_value(Some(Arc::new({
        let start = start.clone();
        move || start(())
    })));

    let _ = use_event_listener(container, ev::scroll, move |_| {
        refresh();
        debounce.update(|d| d.record(js_sys::Date::now()));
        start(());
    });

    let _ = use_event_listener(use_window(), ev::resize, move |_| refresh());

    let _ = use_event_listener(use_window(), ev::keydown, move |ev| {
        if ev.alt_key() || ev.ctrl_key() || ev.meta_key() {
            return;
        }
        let Some(cmd) = NavCommand::from_key(&ev.key()) else {
            return;
        };
        ev.prevent_default();
        let mut next = state.get_untracked();
        if let Some(i) = next.apply(cmd) {
            go_to(i as isize);
        }
    });

    // first paint, and deep links such as /#skills
    Effect::new(move |_| {
        if container.get().is_none() {
            return;
        }
        refresh();
        let hash = window().location().hash().unwrap_or_default();
        if let Some(i) = section_index_of(&hash) {
            go_to(i as isize);
        }
    });

    Effect::watch(
        move || state.with(|s| s.active()),
        move |active, _, _| {
            let Some(container) = container.get_untracked() else {
                return;
            };
            for (i, el) in section_elements(&container).iter().enumerate() {
                let _ = el.class_list().toggle_with_force("active", i == *active);
            }
            if let Some(section) = sections.get(*active) {
                log::debug!("active section: {}", section.id);
                replace_fragment(section.id);
            }
        },
        false,
    );

    view! {
        <div class="fixed top-0 left-0 z-50 h-1 w-full bg-brightBlack/30" aria-hidden="true">
            <div
                class="h-full bg-cyan transition-[width] duration-150 ease-out"
                style:width=move || format!("{:.2}%", progress.get())
            ></div>
        </div>
        <nav
            aria-label="Sections"
            class="fixed right-6 top-1/2 z-40 -translate-y-1/2 flex flex-col gap-4"
        >
            {sections
                .iter()
                .map(|section| {
                    let index = section.index;
                    let label = section.label;
                    view! {
                        <button
                            type="button"
                            title=label
                            aria-label=label
                            aria-current=move || {
                                (state.get().active() == index).then_some("true")
                            }
                            class="p-1"
                            on:click=move |_| go_to(index as isize)
                        >
                            <span class=move || {
                                marker_class(state.get().active() == index, scrolling.get())
                            }></span>
                        </button>
                    }
                })
                .collect_view()}
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_class() {
        assert!(marker_class(true, true).contains("scale-125"));
        assert!(marker_class(true, false).contains("scale-125"));
        assert!(marker_class(false, true).contains("scale-75"));
        assert!(!marker_class(false, false).contains("scale-75"));
    }
}
