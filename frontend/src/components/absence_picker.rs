use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AbsencePickerProps {
    /// Text currently typed into the picker
    pub input: String,
    pub absent: Vec<String>,
    pub suggestions: Vec<String>,
    pub disabled: bool,
    pub on_input: Callback<String>,
    pub on_add: Callback<()>,
    pub on_pick: Callback<String>,
    pub on_remove: Callback<usize>,
}

#[function_component(AbsencePicker)]
pub fn absence_picker(props: &AbsencePickerProps) -> Html {
    let on_input = {
        let on_input = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_input.emit(input.value());
        })
    };

    // Enter adds the typed name instead of submitting the whole form
    let on_keydown = {
        let on_add = props.on_add.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                e.prevent_default();
                on_add.emit(());
            }
        })
    };

    let on_add_click = {
        let on_add = props.on_add.clone();
        Callback::from(move |_: MouseEvent| on_add.emit(()))
    };

    html! {
        <div class="absence-picker form-group">
            <label for="absent-student">{"Absent students"}</label>
            <div class="picker-input">
                <input
                    type="text"
                    id="absent-student"
                    placeholder="Start typing a name..."
                    autocomplete="off"
                    value={props.input.clone()}
                    oninput={on_input}
                    onkeydown={on_keydown}
                    disabled={props.disabled}
                />
                <button type="button" class="btn btn-secondary" onclick={on_add_click} disabled={props.disabled}>
                    {"Add"}
                </button>
            </div>
            {if !props.suggestions.is_empty() {
                html! {
                    <ul class="suggestions">
                        {for props.suggestions.iter().map(|name| {
                            let onclick = {
                                let on_pick = props.on_pick.clone();
                                let name = name.clone();
                                Callback::from(move |_: MouseEvent| on_pick.emit(name.clone()))
                            };
                            html! { <li class="suggestion" {onclick}>{name}</li> }
                        })}
                    </ul>
                }
            } else {
                html! {}
            }}
            <ul class="absent-list">
                {for props.absent.iter().enumerate().map(|(index, name)| {
                    let onclick = {
                        let on_remove = props.on_remove.clone();
                        Callback::from(move |_: MouseEvent| on_remove.emit(index))
                    };
                    html! {
                        <li class="absent-chip">
                            <span>{name}</span>
                            <button type="button" class="chip-remove" {onclick} disabled={props.disabled}>{"×"}</button>
                        </li>
                    }
                })}
            </ul>
        </div>
    }
}
