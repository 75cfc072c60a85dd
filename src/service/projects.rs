use crate::models::project::{Project, ProjectList, ProjectNameRequest};
use crate::service::cache::{QueryCache, QueryKey};
use crate::service::transport::{ApiRequest, ApiTransport};
use crate::service::{ServiceError, checked_body, load, overview, submit_as};

const PROJECTS: &str = "projects";

pub fn key(include_archived: bool) -> QueryKey {
    QueryKey::new([PROJECTS.to_string(), include_archived.to_string()])
}

fn invalidates() -> [QueryKey; 2] {
    [QueryKey::new([PROJECTS]), overview::key()]
}

pub struct ProjectService<'a, T: ApiTransport + ?Sized> {
    transport: &'a T,
    cache: &'a QueryCache,
}

impl<'a, T: ApiTransport + ?Sized> ProjectService<'a, T> {
    pub fn new(transport: &'a T, cache: &'a QueryCache) -> Self {
        ProjectService { transport, cache }
    }

    pub async fn list(&self, include_archived: bool) -> Result<ProjectList, ServiceError> {
        self.cache
            .query(key(include_archived), self.cache.default_options(), move || self.fetch(include_archived))
            .await
    }

    async fn fetch(&self, include_archived: bool) -> Result<ProjectList, ServiceError> {
        let mut request = ApiRequest::get("/organization/projects");
        if include_archived {
            request = request.with_query(vec![("include_archived".to_string(), "true".to_string())]);
        }
        load(self.transport, request, "Failed to load projects").await
    }

    pub async fn create(&self, name: &str) -> Result<Project, ServiceError> {
        let body = checked_body(&ProjectNameRequest::new(name), &["name"], "Invalid project payload")?;
        let request = ApiRequest::post("/organization/projects").with_body(body);
        let request = &request;
        self.cache
            .mutate(&invalidates(), move || submit_as(self.transport, request.clone(), "Failed to create project"))
            .await
    }

    pub async fn rename(&self, id: &str, name: &str) -> Result<Project, ServiceError> {
        let body = checked_body(&ProjectNameRequest::new(name), &["name"], "Invalid project payload")?;
        let request = ApiRequest::post(format!("/organization/projects/{}", urlencoding::encode(id))).with_body(body);
        let request = &request;
        self.cache
            .mutate(&invalidates(), move || submit_as(self.transport, request.clone(), "Failed to update project"))
            .await
    }

    pub async fn archive(&self, id: &str) -> Result<Project, ServiceError> {
        let request = ApiRequest::post(format!("/organization/projects/{}/archive", urlencoding::encode(id)));
        let request = &request;
        self.cache
            .mutate(&invalidates(), move || submit_as(self.transport, request.clone(), "Failed to archive project"))
            .await
    }
}
