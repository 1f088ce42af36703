//! In-memory catalog, user directory, and tenant configuration.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::billing::Plan;
use crate::domain::foundation::{
    DomainError, ErrorCode, PlanId, ProfessionalId, ServiceId, TenantId, UserId,
};
use crate::domain::scheduling::{Professional, Service, UserAccount};
use crate::ports::{
    CatalogReader, SmtpSettings, TenantConfig, TenantConfigReader, UserDirectory,
};

/// In-memory catalog plus user directory.
#[derive(Default)]
pub struct InMemoryCatalog {
    services: Mutex<HashMap<ServiceId, Service>>,
    professionals: Mutex<HashMap<ProfessionalId, Professional>>,
    plans: Mutex<HashMap<PlanId, Plan>>,
    users: Mutex<HashMap<UserId, UserAccount>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_service(&self, service: Service) {
        self.services.lock().unwrap().insert(service.id, service);
    }

    pub fn add_professional(&self, professional: Professional) {
        self.professionals
            .lock()
            .unwrap()
            .insert(professional.id, professional);
    }

    pub fn add_plan(&self, plan: Plan) {
        self.plans.lock().unwrap().insert(plan.id, plan);
    }

    pub fn add_user(&self, user: UserAccount) {
        self.users.lock().unwrap().insert(user.id, user);
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn service(
        &self,
        tenant_id: TenantId,
        id: ServiceId,
    ) -> Result<Option<Service>, DomainError> {
        Ok(self
            .services
            .lock()
            .unwrap()
            .get(&id)
            .filter(|s| s.tenant_id == tenant_id)
            .cloned())
    }

    async fn services(
        &self,
        tenant_id: TenantId,
        ids: &[ServiceId],
    ) -> Result<Vec<Service>, DomainError> {
        let guard = self.services.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| guard.get(id).filter(|s| s.tenant_id == tenant_id).cloned())
            .collect())
    }

    async fn list_services(&self, tenant_id: TenantId) -> Result<Vec<Service>, DomainError> {
        let mut services: Vec<Service> = self
            .services
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.tenant_id == tenant_id)
            .cloned()
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }

    async fn professional(
        &self,
        tenant_id: TenantId,
        id: ProfessionalId,
    ) -> Result<Option<Professional>, DomainError> {
        Ok(self
            .professionals
            .lock()
            .unwrap()
            .get(&id)
            .filter(|p| p.tenant_id == tenant_id)
            .cloned())
    }

    async fn list_professionals(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<Professional>, DomainError> {
        let mut professionals: Vec<Professional> = self
            .professionals
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.tenant_id == tenant_id)
            .cloned()
            .collect();
        professionals.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(professionals)
    }

    async fn plan(&self, tenant_id: TenantId, id: PlanId) -> Result<Option<Plan>, DomainError> {
        Ok(self
            .plans
            .lock()
            .unwrap()
            .get(&id)
            .filter(|p| p.tenant_id == tenant_id)
            .cloned())
    }
}

#[async_trait]
impl UserDirectory for InMemoryCatalog {
    async fn user(
        &self,
        tenant_id: TenantId,
        id: UserId,
    ) -> Result<Option<UserAccount>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(&id)
            .filter(|u| u.tenant_id == tenant_id)
            .cloned())
    }
}

/// In-memory tenant configuration store.
#[derive(Default)]
pub struct InMemoryTenantConfig {
    configs: Mutex<HashMap<TenantId, TenantConfig>>,
}

impl InMemoryTenantConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tenant with every channel and the gateway configured.
    pub fn configured(tenant_id: TenantId) -> Self {
        let store = Self::new();
        store.insert(
            tenant_id,
            TenantConfig {
                business_name: "Test Business".to_string(),
                smtp: Some(test_smtp()),
                chat_api_key: Some(SecretString::new("chat-key-test".to_string())),
                gateway_access_token: Some(SecretString::new("gw-token-test".to_string())),
                template_overrides: HashMap::new(),
            },
        );
        store
    }

    /// A tenant with only email configured (no chat, no gateway).
    pub fn email_only(tenant_id: TenantId) -> Self {
        let store = Self::new();
        store.insert(
            tenant_id,
            TenantConfig {
                business_name: "Test Business".to_string(),
                smtp: Some(test_smtp()),
                chat_api_key: None,
                gateway_access_token: None,
                template_overrides: HashMap::new(),
            },
        );
        store
    }

    pub fn insert(&self, tenant_id: TenantId, config: TenantConfig) {
        self.configs.lock().unwrap().insert(tenant_id, config);
    }
}

fn test_smtp() -> SmtpSettings {
    SmtpSettings {
        host: "smtp.test".to_string(),
        port: 587,
        username: "mailer".to_string(),
        password: SecretString::new("secret".to_string()),
        from_email: "noreply@test".to_string(),
        from_name: "Test Business".to_string(),
    }
}

#[async_trait]
impl TenantConfigReader for InMemoryTenantConfig {
    async fn config(&self, tenant_id: TenantId) -> Result<TenantConfig, DomainError> {
        self.configs
            .lock()
            .unwrap()
            .get(&tenant_id)
            .cloned()
            .ok_or_else(|| DomainError::new(ErrorCode::TenantNotFound, "Tenant not found"))
    }
}
