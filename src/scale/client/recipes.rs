use super::ScaleClient;
use crate::error::Result;
use crate::model::{NewRecipe, RecipeType, Warning};
use serde_json::Value;

impl ScaleClient {
    pub fn list_recipe_types(&self) -> Result<Vec<RecipeType>> {
        self.list_all("/recipe-types/", &[])
    }

    pub fn get_recipe_type(&self, id: i64) -> Result<RecipeType> {
        self.get(&format!("/recipe-types/{}/", id))
    }

    pub fn validate_recipe_type(&self, recipe_type: &RecipeType) -> Result<Vec<Warning>> {
        self.validate("/recipe-types/validation/", recipe_type)
    }

    pub fn create_recipe_type(&self, recipe_type: &RecipeType) -> Result<RecipeType> {
        self.post("/recipe-types/", recipe_type)
    }

    /// Queues a recipe and returns the location of the new recipe.
    pub fn queue_recipe(&self, recipe_type_id: i64, recipe_data: &Value) -> Result<String> {
        let body = NewRecipe {
            recipe_type_id,
            recipe_data,
        };
        self.post_created("/queue/new-recipe/", &body)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::with_client;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_recipe_types() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recipe-types/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1,
                "next": null,
                "previous": null,
                "results": [{"id": 1, "name": "pipeline", "version": "1.0", "definition": {"jobs": []}}]
            })))
            .mount(&server)
            .await;

        let recipes = with_client(server.uri(), |client| client.list_recipe_types().unwrap()).await;
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].definition, json!({"jobs": []}));
    }

    #[tokio::test]
    async fn test_queue_recipe() {
        let server = MockServer::start().await;
        let data = json!({"version": "1.0", "input_data": []});
        Mock::given(method("POST"))
            .and(path("/queue/new-recipe/"))
            .and(body_json(json!({"recipe_type_id": 2, "recipe_data": data.clone()})))
            .respond_with(ResponseTemplate::new(201).insert_header("Location", "/recipes/5/"))
            .mount(&server)
            .await;

        let location = with_client(server.uri(), move |client| {
            client.queue_recipe(2, &data).unwrap()
        })
        .await;
        assert_eq!(location, "/recipes/5/");
    }
}
