use chrono::NaiveDate;
use shared::Session;
use yew::prelude::*;

mod components;
mod config;
mod hooks;
mod services;

use components::{AssessmentForm, ClassLogWeek, Directory, Header, SignIn, Tab, TimetableGrid};
use config::AppConfig;
use hooks::use_departments::use_departments;
use services::api::ApiClient;
use services::date_utils;
use services::logging::Logger;

#[derive(Properties, PartialEq)]
struct WorkspaceProps {
    config: AppConfig,
    session: Session,
    today: NaiveDate,
    on_sign_out: Callback<()>,
}

/// Everything behind sign-in. Mounted once per session, so every hook
/// below starts fresh for a new user.
#[function_component(Workspace)]
fn workspace(props: &WorkspaceProps) -> Html {
    let active_tab = use_state(|| Tab::ClassLogs);
    let api_client = use_memo((props.config.clone(), props.session.clone()), |(config, session)| {
        ApiClient::new(config, session)
    });
    let departments = use_departments(&api_client, &props.session);

    let on_select_tab = {
        let active_tab = active_tab.clone();
        Callback::from(move |tab: Tab| active_tab.set(tab))
    };

    let content = match *active_tab {
        Tab::Timetable => html! {
            <TimetableGrid api_client={(*api_client).clone()} drop_policy={props.config.drop_policy} />
        },
        Tab::ClassLogs => html! {
            <ClassLogWeek
                api_client={(*api_client).clone()}
                config={props.config.clone()}
                today={props.today}
                departments={departments.clone()}
            />
        },
        Tab::Assessments => html! {
            <AssessmentForm
                api_client={(*api_client).clone()}
                departments={departments.departments.clone()}
                today={props.today}
                notice_duration_ms={props.config.notice_duration_ms}
            />
        },
        Tab::Directory => html! {
            <Directory api_client={(*api_client).clone()} session={props.session.clone()} />
        },
    };

    html! {
        <>
            <Header
                session={props.session.clone()}
                active_tab={*active_tab}
                {on_select_tab}
                on_sign_out={props.on_sign_out.clone()}
            />
            <main class="main">
                <div class="container">
                    {content}
                </div>
            </main>
        </>
    }
}

#[function_component(App)]
fn app() -> Html {
    let config = use_state(AppConfig::default);
    let today = use_state(date_utils::today);
    let session = use_state(|| Option::<Session>::None);

    let on_signed_in = {
        let session = session.clone();
        Callback::from(move |signed_in: Session| session.set(Some(signed_in)))
    };

    let on_sign_out = {
        let session = session.clone();
        Callback::from(move |_: ()| {
            Logger::info_with_component("app", "Signed out");
            session.set(None);
        })
    };

    match (*session).clone() {
        Some(session) => {
            let key = session.user.id.clone();
            html! {
            <Workspace
                {key}
                config={(*config).clone()}
                {session}
                today={*today}
                {on_sign_out}
            />
            }
        }
        None => html! {
            <main class="main">
                <div class="container">
                    <SignIn config={(*config).clone()} {on_signed_in} />
                </div>
            </main>
        },
    }
}

fn main() {
    Logger::install_log_sink(AppConfig::default().log_level);
    yew::Renderer::<App>::new().render();
}
