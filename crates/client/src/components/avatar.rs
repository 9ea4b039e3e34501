//! User avatar with a color derived from the user's name.

use dioxus::prelude::*;

use crate::format::string_to_color;

#[derive(Props, Clone, PartialEq)]
pub struct AvatarProps {
    pub name: String,
    #[props(optional)]
    pub size: Option<&'static str>,
}

#[component]
pub fn Avatar(props: AvatarProps) -> Element {
    let size = props.size.unwrap_or("w-10 h-10");
    let color = string_to_color(&props.name);
    let initial = props
        .name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();

    rsx! {
        div {
            class: "{size} rounded-full flex items-center justify-center text-white font-semibold",
            style: "background-color: {color}",
            title: "{props.name}",
            "{initial}"
        }
    }
}
