use std::rc::Rc;

use shared::{Notice, NoticeBoard, NoticeKind};
use yew::prelude::*;

use super::use_notice_timer::use_notice_timer;

#[derive(Default, PartialEq)]
struct NoticeState(NoticeBoard);

enum NoticeAction {
    Raise(NoticeKind, String),
    Dismiss(u64),
}

impl Reducible for NoticeState {
    type Action = NoticeAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut board = self.0.clone();
        match action {
            NoticeAction::Raise(kind, message) => {
                board.raise(kind, message);
            }
            NoticeAction::Dismiss(id) => {
                if !board.dismiss(id) {
                    return self;
                }
            }
        }
        Rc::new(NoticeState(board))
    }
}

pub struct UseNoticeBoardResult {
    pub current: Option<Notice>,
    pub raise: Callback<(NoticeKind, String)>,
    pub dismiss: Callback<u64>,
}

/// A standalone notice board whose notices clear themselves after `duration_ms`
#[hook]
pub fn use_notice_board(duration_ms: u32) -> UseNoticeBoardResult {
    let state = use_reducer(NoticeState::default);

    let raise = {
        let dispatcher = state.dispatcher();
        Callback::from(move |(kind, message): (NoticeKind, String)| {
            dispatcher.dispatch(NoticeAction::Raise(kind, message))
        })
    };
    let dismiss = {
        let dispatcher = state.dispatcher();
        Callback::from(move |id: u64| dispatcher.dispatch(NoticeAction::Dismiss(id)))
    };

    let current = state.0.current().cloned();
    use_notice_timer(current.as_ref().map(|notice| notice.id), duration_ms, dismiss.clone());

    UseNoticeBoardResult {
        current,
        raise,
        dismiss,
    }
}
