use shared::Session;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Timetable,
    ClassLogs,
    Assessments,
    Directory,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Timetable, Tab::ClassLogs, Tab::Assessments, Tab::Directory];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Timetable => "Timetable",
            Tab::ClassLogs => "Class logs",
            Tab::Assessments => "Assessments",
            Tab::Directory => "Directory",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub session: Session,
    pub active_tab: Tab,
    pub on_select_tab: Callback<Tab>,
    pub on_sign_out: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let on_sign_out = {
        let on_sign_out = props.on_sign_out.clone();
        Callback::from(move |_: MouseEvent| on_sign_out.emit(()))
    };

    html! {
        <header class="header">
            <div class="container">
                <h1>{"School Admin"}</h1>
                <nav class="tabs">
                    {for Tab::ALL.iter().map(|tab| {
                        let tab = *tab;
                        let class = if tab == props.active_tab { "tab active" } else { "tab" };
                        let onclick = {
                            let on_select_tab = props.on_select_tab.clone();
                            Callback::from(move |_: MouseEvent| on_select_tab.emit(tab))
                        };
                        html! { <button type="button" {class} {onclick}>{tab.label()}</button> }
                    })}
                </nav>
                <div class="header-right">
                    <span class="user-name">
                        {format!("{} · {}", props.session.user.name, props.session.user.role)}
                    </span>
                    <button type="button" class="btn btn-secondary" onclick={on_sign_out}>
                        {"Sign out"}
                    </button>
                </div>
            </div>
        </header>
    }
}
