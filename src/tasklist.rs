use crate::models::{EditSession, FormState, Task};

/// Single source of truth for the task collection and the in-progress form
/// draft. The UI never touches the task vector directly; every mutation goes
/// through one of the operations below, each of which runs to completion on
/// the event loop before the next event is read.
#[derive(Debug)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: u64,
    form: FormState,
    description_draft: String,
    deadline_draft: String,
    search_text: String,
    pending_delete: Option<u64>,
    validation: Option<&'static str>,
}

const EMPTY_DESCRIPTION: &str = "Description cannot be empty";

impl TaskList {
    pub fn new() -> Self {
        TaskList {
            tasks: Vec::new(),
            next_id: 1,
            form: FormState::Closed,
            description_draft: String::new(),
            deadline_draft: String::new(),
            search_text: String::new(),
            pending_delete: None,
            validation: None,
        }
    }

    /// Open the form for a new task with fresh drafts.
    pub fn start_add(&mut self) {
        self.description_draft.clear();
        self.deadline_draft.clear();
        self.validation = None;
        self.form = FormState::Open(EditSession::None);
    }

    /// Open the form pre-filled with the task's current values. Ids only ever
    /// come from the current render of the list, so an unknown id is a logged
    /// no-op rather than an error.
    pub fn start_edit(&mut self, id: u64) {
        match self.tasks.iter().find(|t| t.id == id) {
            Some(task) => {
                self.description_draft = task.description.clone();
                self.deadline_draft = task.deadline.clone();
                self.validation = None;
                self.form = FormState::Open(EditSession::Editing(id));
            }
            None => log::warn!("edit requested for unknown task #{}", id),
        }
    }

    pub fn update_draft_description(&mut self, text: &str) {
        self.description_draft = text.to_string();
        self.validation = None;
    }

    pub fn update_draft_deadline(&mut self, text: &str) {
        self.deadline_draft = text.to_string();
        self.validation = None;
    }

    /// Validate and apply the drafts. An empty-after-trim description leaves
    /// the form open with a validation message and the list untouched.
    pub fn commit(&mut self) {
        let session = match self.form {
            FormState::Open(session) => session,
            FormState::Closed => return,
        };

        let description = self.description_draft.trim();
        if description.is_empty() {
            self.validation = Some(EMPTY_DESCRIPTION);
            return;
        }

        match session {
            EditSession::None => {
                let task = Task {
                    id: self.next_id,
                    description: description.to_string(),
                    deadline: self.deadline_draft.clone(),
                };
                self.next_id += 1;
                log::debug!("added task #{}", task.id);
                self.tasks.push(task);
            }
            EditSession::Editing(id) => {
                match self.tasks.iter_mut().find(|t| t.id == id) {
                    Some(task) => {
                        task.description = description.to_string();
                        task.deadline = self.deadline_draft.clone();
                    }
                    None => log::warn!("commit for unknown task #{}", id),
                }
            }
        }

        self.close_form();
    }

    /// Discard the drafts and close the form. The list is never touched.
    pub fn cancel(&mut self) {
        self.close_form();
    }

    fn close_form(&mut self) {
        self.description_draft.clear();
        self.deadline_draft.clear();
        self.validation = None;
        self.form = FormState::Closed;
    }

    /// Record the id awaiting confirmation; the UI renders the dialog from
    /// this and resolves it with `delete` or `cancel_delete`.
    pub fn request_delete(&mut self, id: u64) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Remove the task with the matching id. No-op when absent.
    pub fn delete(&mut self, id: u64) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() < before {
            log::debug!("deleted task #{}", id);
        }
        if self.pending_delete == Some(id) {
            self.pending_delete = None;
        }
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_string();
    }

    /// Tasks whose description contains the search text case-insensitively,
    /// in list order. Recomputed on every call; either the list or the
    /// filter may have changed since the last render.
    pub fn visible_tasks(&self) -> impl Iterator<Item = &Task> {
        let needle = self.search_text.to_lowercase();
        self.tasks
            .iter()
            .filter(move |t| t.description.to_lowercase().contains(&needle))
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn form_state(&self) -> FormState {
        self.form
    }

    pub fn description_draft(&self) -> &str {
        &self.description_draft
    }

    pub fn deadline_draft(&self) -> &str {
        &self.deadline_draft
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn validation(&self) -> Option<&'static str> {
        self.validation
    }

    pub fn pending_delete(&self) -> Option<u64> {
        self.pending_delete
    }
}

impl Default for TaskList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(list: &mut TaskList, description: &str, deadline: &str) -> u64 {
        list.start_add();
        list.update_draft_description(description);
        list.update_draft_deadline(deadline);
        list.commit();
        list.visible_tasks().last().map(|t| t.id).unwrap()
    }

    fn descriptions(list: &TaskList) -> Vec<String> {
        list.visible_tasks().map(|t| t.description.clone()).collect()
    }

    #[test]
    fn add_commit_appends_trimmed_description() {
        let mut list = TaskList::new();
        list.start_add();
        list.update_draft_description("  Buy milk  ");
        list.commit();

        assert_eq!(list.len(), 1);
        let task = list.visible_tasks().next().unwrap();
        assert_eq!(task.description, "Buy milk");
        assert_eq!(task.deadline, "");
        assert_eq!(list.form_state(), FormState::Closed);
        assert_eq!(list.description_draft(), "");
    }

    #[test]
    fn empty_commit_is_rejected_in_add_mode() {
        let mut list = TaskList::new();
        list.start_add();
        list.update_draft_description("   ");
        list.commit();

        assert_eq!(list.len(), 0);
        assert_eq!(list.form_state(), FormState::Open(EditSession::None));
        assert_eq!(list.validation(), Some(EMPTY_DESCRIPTION));
    }

    #[test]
    fn empty_commit_is_rejected_in_edit_mode() {
        let mut list = TaskList::new();
        let id = add(&mut list, "Buy milk", "");

        list.start_edit(id);
        list.update_draft_description("");
        list.commit();

        assert_eq!(list.get(id).unwrap().description, "Buy milk");
        assert_eq!(list.form_state(), FormState::Open(EditSession::Editing(id)));
        assert_eq!(list.validation(), Some(EMPTY_DESCRIPTION));
    }

    #[test]
    fn editing_a_draft_clears_the_validation_message() {
        let mut list = TaskList::new();
        list.start_add();
        list.commit();
        assert!(list.validation().is_some());

        list.update_draft_description("B");
        assert!(list.validation().is_none());
    }

    #[test]
    fn edit_commit_rewrites_only_the_target() {
        let mut list = TaskList::new();
        let a = add(&mut list, "alpha", "");
        let b = add(&mut list, "beta", "2026-01-01 09:00");
        let c = add(&mut list, "gamma", "");

        list.start_edit(b);
        assert_eq!(list.description_draft(), "beta");
        assert_eq!(list.deadline_draft(), "2026-01-01 09:00");
        list.update_draft_description("bravo");
        list.commit();

        assert_eq!(descriptions(&list), ["alpha", "bravo", "gamma"]);
        assert_eq!(list.get(b).unwrap().id, b);
        assert_eq!(list.get(a).unwrap().description, "alpha");
        assert_eq!(list.get(c).unwrap().description, "gamma");
    }

    #[test]
    fn edit_commit_can_change_only_the_deadline() {
        let mut list = TaskList::new();
        let id = add(&mut list, "Buy milk", "");

        list.start_edit(id);
        list.update_draft_deadline("2026-08-07 08:00");
        list.commit();

        let task = list.get(id).unwrap();
        assert_eq!(task.description, "Buy milk");
        assert_eq!(task.deadline, "2026-08-07 08:00");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn cancel_discards_drafts() {
        let mut list = TaskList::new();
        let id = add(&mut list, "Buy milk", "");

        list.start_edit(id);
        list.update_draft_description("scribble");
        list.update_draft_deadline("scratch");
        list.cancel();

        assert_eq!(list.form_state(), FormState::Closed);
        assert_eq!(list.get(id).unwrap().description, "Buy milk");

        list.start_add();
        assert_eq!(list.description_draft(), "");
        assert_eq!(list.deadline_draft(), "");

        list.start_edit(id);
        assert_eq!(list.description_draft(), "Buy milk");
    }

    #[test]
    fn start_edit_with_unknown_id_is_a_noop() {
        let mut list = TaskList::new();
        add(&mut list, "alpha", "");

        list.start_edit(99);

        assert_eq!(list.form_state(), FormState::Closed);
        assert_eq!(list.description_draft(), "");
    }

    #[test]
    fn commit_with_closed_form_is_a_noop() {
        let mut list = TaskList::new();
        list.update_draft_description("orphan draft");
        list.commit();

        assert_eq!(list.len(), 0);
        assert_eq!(list.form_state(), FormState::Closed);
    }

    #[test]
    fn delete_removes_exactly_the_matching_task() {
        let mut list = TaskList::new();
        let a = add(&mut list, "alpha", "");
        let b = add(&mut list, "beta", "");
        let c = add(&mut list, "gamma", "");

        list.delete(b);

        assert_eq!(list.len(), 2);
        assert_eq!(descriptions(&list), ["alpha", "gamma"]);
        assert!(list.get(a).is_some());
        assert!(list.get(c).is_some());
    }

    #[test]
    fn delete_with_unknown_id_is_a_noop() {
        let mut list = TaskList::new();
        add(&mut list, "alpha", "");

        list.delete(42);

        assert_eq!(list.len(), 1);
    }

    #[test]
    fn request_delete_is_resolved_by_delete_or_cancel() {
        let mut list = TaskList::new();
        let id = add(&mut list, "alpha", "");

        list.request_delete(id);
        assert_eq!(list.pending_delete(), Some(id));
        list.cancel_delete();
        assert_eq!(list.pending_delete(), None);
        assert_eq!(list.len(), 1);

        list.request_delete(id);
        list.delete(id);
        assert_eq!(list.pending_delete(), None);
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn ids_stay_unique_after_deletes() {
        let mut list = TaskList::new();
        let a = add(&mut list, "alpha", "");
        let b = add(&mut list, "beta", "");
        list.delete(b);
        let c = add(&mut list, "gamma", "");

        assert_ne!(c, a);
        assert_ne!(c, b);
    }

    #[test]
    fn search_filters_by_case_insensitive_substring_in_order() {
        let mut list = TaskList::new();
        add(&mut list, "Buy milk", "");
        add(&mut list, "Walk the dog", "");
        add(&mut list, "Buy MILK again", "");

        list.set_search_text("milk");
        assert_eq!(descriptions(&list), ["Buy milk", "Buy MILK again"]);

        list.set_search_text("WALK");
        assert_eq!(descriptions(&list), ["Walk the dog"]);
    }

    #[test]
    fn empty_search_returns_the_full_list() {
        let mut list = TaskList::new();
        add(&mut list, "alpha", "");
        add(&mut list, "beta", "");

        list.set_search_text("");
        assert_eq!(list.visible_tasks().count(), 2);
    }

    #[test]
    fn search_never_mutates_the_list() {
        let mut list = TaskList::new();
        add(&mut list, "alpha", "");

        list.set_search_text("zzz");
        assert_eq!(list.visible_tasks().count(), 0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn visible_tasks_is_recomputed_on_every_call() {
        let mut list = TaskList::new();
        list.set_search_text("milk");
        assert_eq!(list.visible_tasks().count(), 0);

        add(&mut list, "Buy milk", "");
        assert_eq!(list.visible_tasks().count(), 1);
    }

    #[test]
    fn buy_milk_scenario() {
        let mut list = TaskList::new();
        list.start_add();
        list.update_draft_description("Buy milk");
        list.commit();

        let task = list.visible_tasks().next().unwrap();
        assert_eq!(task.description, "Buy milk");
        assert_eq!(task.deadline, "");

        list.set_search_text("milk");
        assert_eq!(list.visible_tasks().count(), 1);
        list.set_search_text("eggs");
        assert_eq!(list.visible_tasks().count(), 0);
    }
}
