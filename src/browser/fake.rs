//! In-memory search page for tests.
//!
//! [`FakeSession`] answers lookups for the locators of
//! [`SiteLayout::default`] and records every interaction in a [`Journal`]
//! that stays readable after the session is closed.

use super::{BrowserError, BrowserSession, Locator};
use crate::scrapers::latimes::SiteLayout;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
enum FakeImage {
    None,
    WithoutSrc,
    Src(String),
}

/// One item of the fake result list.
#[derive(Debug, Clone)]
pub struct FakeArticle {
    title: Option<String>,
    date: String,
    description: String,
    image: FakeImage,
}

impl FakeArticle {
    pub fn new(title: &str, date: &str, description: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            date: date.to_string(),
            description: description.to_string(),
            image: FakeImage::None,
        }
    }

    pub fn with_image(mut self, src: &str) -> Self {
        self.image = FakeImage::Src(src.to_string());
        self
    }

    pub fn with_image_without_src(mut self) -> Self {
        self.image = FakeImage::WithoutSrc;
        self
    }

    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeElement {
    SearchButton,
    SearchInput,
    TopicCheckbox,
    TopicLabel(String),
    ResultsList,
    Item(usize),
    Title(usize),
    Date(usize),
    Description(usize),
    Image(usize),
}

/// Shared log of the interactions with a [`FakeSession`].
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    fn push(&self, entry: String) {
        self.0.borrow_mut().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.0.borrow().iter().any(|e| e == entry)
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == entry).count()
    }
}

pub struct FakeSession {
    layout: SiteLayout,
    articles: Vec<FakeArticle>,
    topics: Vec<String>,
    search_controls: bool,
    search_input: bool,
    result_list: bool,
    broken_navigation: bool,
    panicking_navigation: bool,
    stale_reads: Cell<u32>,
    last_stale_read: Cell<Option<Instant>>,
    refresh_delays: RefCell<Vec<Duration>>,
    journal: Journal,
}

impl FakeSession {
    /// A page with working search controls, a "Business" topic, and
    /// `articles` in the result list.
    pub fn new(articles: Vec<FakeArticle>) -> Self {
        Self {
            layout: SiteLayout::default(),
            articles,
            topics: vec!["Business".to_string()],
            search_controls: true,
            search_input: true,
            result_list: true,
            broken_navigation: false,
            panicking_navigation: false,
            stale_reads: Cell::new(0),
            last_stale_read: Cell::new(None),
            refresh_delays: RefCell::new(Vec::new()),
            journal: Journal::default(),
        }
    }

    pub fn with_topics(mut self, topics: &[&str]) -> Self {
        self.topics = topics.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn without_search_controls(mut self) -> Self {
        self.search_controls = false;
        self
    }

    /// The search button stays clickable but the input never shows up.
    pub fn without_search_input(mut self) -> Self {
        self.search_input = false;
        self
    }

    pub fn without_result_list(mut self) -> Self {
        self.result_list = false;
        self
    }

    pub fn with_broken_navigation(mut self) -> Self {
        self.broken_navigation = true;
        self
    }

    /// Navigation panics instead of returning.
    pub fn with_panicking_navigation(mut self) -> Self {
        self.panicking_navigation = true;
        self
    }

    /// The next `n` text reads fail with a stale element error.
    pub fn with_stale_reads(self, n: u32) -> Self {
        self.stale_reads.set(n);
        self
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    /// Time between each refresh and the stale read that preceded it.
    pub fn refresh_delays(&self) -> Vec<Duration> {
        self.refresh_delays.borrow().clone()
    }

    fn timeout(locator: &Locator, timeout: Duration) -> BrowserError {
        BrowserError::Timeout {
            locator: locator.to_string(),
            timeout,
        }
    }

    fn article(&self, index: usize) -> &FakeArticle {
        &self.articles[index]
    }
}

impl BrowserSession for FakeSession {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        if self.panicking_navigation {
            panic!("browser crashed while loading {url}");
        }
        if self.broken_navigation {
            return Err(BrowserError::Driver("session not created".to_string()));
        }
        self.journal.push(format!("navigate {url}"));
        Ok(())
    }

    async fn wait_until_clickable(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<FakeElement, BrowserError> {
        if self.search_controls && *locator == self.layout.search_button {
            return Ok(FakeElement::SearchButton);
        }
        if !self.topics.is_empty() && *locator == self.layout.topic_checkbox {
            return Ok(FakeElement::TopicCheckbox);
        }
        self.topics
            .iter()
            .find(|topic| *locator == self.layout.topic_label(topic))
            .map(|topic| FakeElement::TopicLabel(topic.clone()))
            .ok_or_else(|| Self::timeout(locator, timeout))
    }

    async fn wait_until_present(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<FakeElement, BrowserError> {
        if self.search_controls && self.search_input && *locator == self.layout.search_input {
            return Ok(FakeElement::SearchInput);
        }
        if self.result_list && *locator == self.layout.results_list {
            return Ok(FakeElement::ResultsList);
        }
        Err(Self::timeout(locator, timeout))
    }

    async fn find_in(
        &self,
        parent: &FakeElement,
        locator: &Locator,
    ) -> Result<FakeElement, BrowserError> {
        let missing = || BrowserError::NoSuchElement(locator.to_string());
        let FakeElement::Item(index) = *parent else {
            return Err(missing());
        };
        let article = self.article(index);
        if *locator == self.layout.title {
            article.title.as_ref().map(|_| FakeElement::Title(index)).ok_or_else(missing)
        } else if *locator == self.layout.date {
            Ok(FakeElement::Date(index))
        } else if *locator == self.layout.description {
            Ok(FakeElement::Description(index))
        } else if *locator == self.layout.image {
            match article.image {
                FakeImage::None => Err(missing()),
                _ => Ok(FakeElement::Image(index)),
            }
        } else {
            Err(missing())
        }
    }

    async fn find_all_in(
        &self,
        parent: &FakeElement,
        locator: &Locator,
    ) -> Result<Vec<FakeElement>, BrowserError> {
        if *parent == FakeElement::ResultsList && *locator == self.layout.result_item {
            Ok((0..self.articles.len()).map(FakeElement::Item).collect())
        } else {
            Ok(Vec::new())
        }
    }

    async fn click(&self, element: &FakeElement) -> Result<(), BrowserError> {
        self.journal.push(format!("click {element:?}"));
        Ok(())
    }

    async fn send_keys(&self, _element: &FakeElement, text: &str) -> Result<(), BrowserError> {
        self.journal.push(format!("send_keys {text}"));
        Ok(())
    }

    async fn submit(&self, _element: &FakeElement) -> Result<(), BrowserError> {
        self.journal.push("submit".to_string());
        Ok(())
    }

    async fn text(&self, element: &FakeElement) -> Result<String, BrowserError> {
        let remaining = self.stale_reads.get();
        if remaining > 0 {
            self.stale_reads.set(remaining - 1);
            self.last_stale_read.set(Some(Instant::now()));
            return Err(BrowserError::StaleElement);
        }
        match element {
            FakeElement::Title(i) => Ok(self.article(*i).title.clone().unwrap_or_default()),
            FakeElement::Date(i) => Ok(self.article(*i).date.clone()),
            FakeElement::Description(i) => Ok(self.article(*i).description.clone()),
            _ => Ok(String::new()),
        }
    }

    async fn attribute(
        &self,
        element: &FakeElement,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        match (element, name) {
            (FakeElement::Image(i), "src") => match &self.article(*i).image {
                FakeImage::Src(src) => Ok(Some(src.clone())),
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }

    async fn refresh(&self) -> Result<(), BrowserError> {
        if let Some(at) = self.last_stale_read.take() {
            self.refresh_delays.borrow_mut().push(at.elapsed());
        }
        self.journal.push("refresh".to_string());
        Ok(())
    }

    async fn close(self) -> Result<(), BrowserError> {
        self.journal.push("close".to_string());
        Ok(())
    }
}
