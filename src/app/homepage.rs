use leptos::{html, prelude::*};
use leptos_meta::Title;

use super::{
    about::{About, Hero},
    footer::Footer,
    header::Header,
    navigation::SectionNav,
    skills::{Projects, Skills},
};
use crate::nav::SECTIONS;

pub const SCROLL_CONTAINER_ID: &str = "scroll-container";

#[component]
pub fn HomePage() -> impl IntoView {
    let container = NodeRef::<html::Main>::new();

    view! {
        <Title text="Portfolio" />
        <Header container sections=&SECTIONS />
        <SectionNav container sections=&SECTIONS />
        <main
            id=SCROLL_CONTAINER_ID
            node_ref=container
            class="h-screen w-full overflow-y-auto overflow-x-hidden snap-y snap-proximity"
        >
            <Hero section=SECTIONS[0] />
            <About section=SECTIONS[1] />
            <Skills section=SECTIONS[2] />
            <Projects section=SECTIONS[3] />
            <Footer section=SECTIONS[4] />
        </main>
    }
}
