//! In-memory `RecipeApi` for store tests
//!
//! Records every call as a string (`"categories"`, `"filter:Beef"`,
//! `"lookup:52977"`, `"search:pasta"`, `"random"`), serves canned replies and
//! can hold a call until a `oneshot` sender fires.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::oneshot;

use crate::data::{ApiError, Category, Meal, MealDetail, RecipeApi};

#[derive(Debug, Clone)]
pub enum Reply {
    Categories(Vec<Category>),
    Meals(Vec<Meal>),
    Detail(Option<MealDetail>),
    Fail(StatusCode),
}

#[derive(Debug, Default)]
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    replies: Mutex<HashMap<String, Reply>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, call: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .insert(call.to_string(), reply);
    }

    /// Holds the next `call` until the returned sender fires
    pub fn hold(&self, call: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(call.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    async fn answer(&self, call: String) -> Option<Reply> {
        self.calls.lock().unwrap().push(call.clone());
        let gate = self.gates.lock().unwrap().remove(&call);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let reply = self.replies.lock().unwrap().get(&call).cloned();
        reply
    }
}

#[async_trait]
impl RecipeApi for FakeApi {
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        match self.answer("categories".to_string()).await {
            Some(Reply::Categories(categories)) => Ok(categories),
            Some(Reply::Fail(status)) => Err(ApiError::Status(status)),
            _ => Ok(Vec::new()),
        }
    }

    async fn meals_by_category(&self, category: &str) -> Result<Vec<Meal>, ApiError> {
        match self.answer(format!("filter:{}", category)).await {
            Some(Reply::Meals(meals)) => Ok(meals),
            Some(Reply::Fail(status)) => Err(ApiError::Status(status)),
            _ => Ok(Vec::new()),
        }
    }

    async fn meal_by_id(&self, id: &str) -> Result<Option<MealDetail>, ApiError> {
        match self.answer(format!("lookup:{}", id)).await {
            Some(Reply::Detail(detail)) => Ok(detail),
            Some(Reply::Fail(status)) => Err(ApiError::Status(status)),
            _ => Ok(None),
        }
    }

    async fn search_meals(&self, query: &str) -> Result<Vec<Meal>, ApiError> {
        match self.answer(format!("search:{}", query)).await {
            Some(Reply::Meals(meals)) => Ok(meals),
            Some(Reply::Fail(status)) => Err(ApiError::Status(status)),
            _ => Ok(Vec::new()),
        }
    }

    async fn random_meal(&self) -> Result<Option<MealDetail>, ApiError> {
        match self.answer("random".to_string()).await {
            Some(Reply::Detail(detail)) => Ok(detail),
            Some(Reply::Fail(status)) => Err(ApiError::Status(status)),
            _ => Ok(None),
        }
    }
}

pub fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        thumbnail: format!("https://www.themealdb.com/images/category/{}.png", name.to_lowercase()),
        description: format!("{} dishes", name),
    }
}

pub fn meal(id: &str, name: &str) -> Meal {
    Meal {
        id: id.to_string(),
        name: name.to_string(),
        thumbnail: String::new(),
        category: None,
    }
}

pub fn detail(id: &str, name: &str) -> MealDetail {
    MealDetail {
        id: id.to_string(),
        name: name.to_string(),
        thumbnail: String::new(),
        category: "Side".to_string(),
        area: "Turkish".to_string(),
        instructions: "Simmer.".to_string(),
        youtube: None,
        attributes: serde_json::Map::new(),
    }
}
