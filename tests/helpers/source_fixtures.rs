//! CSDL sources shared across test modules.

use edm::Model;
use once_cell::sync::Lazy;

pub const EDMX_V4: &str = "http://docs.oasis-open.org/odata/ns/edmx";
pub const EDM_V4: &str = "http://docs.oasis-open.org/odata/ns/edm";

/// Wrap schema markup in a 4.0 envelope.
pub fn edmx(schemas: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="4.0" xmlns:edmx="{EDMX_V4}">
  <edmx:DataServices>
{schemas}
  </edmx:DataServices>
</edmx:Edmx>"#
    )
}

/// A bare V4 `Schema` with the given namespace and body.
pub fn schema(namespace: &str, body: &str) -> String {
    format!(r#"<Schema Namespace="{namespace}" xmlns="{EDM_V4}">{body}</Schema>"#)
}

pub const CUSTOMER: &str = r#"
<EntityType Name="Customer">
  <Key><PropertyRef Name="Id"/></Key>
  <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
  <Property Name="Name" Type="Edm.String" MaxLength="50"/>
</EntityType>"#;

/// A small storefront: inheritance, navigation with partners, an enum, a
/// bound action, a container with bindings and out-of-line annotations.
pub const SHOP_SCHEMA: &str = r#"
<EnumType Name="Status">
  <Member Name="Open"/>
  <Member Name="Shipped" Value="4"/>
  <Member Name="Closed"/>
</EnumType>
<EntityType Name="Entity" Abstract="true">
  <Key><PropertyRef Name="Id"/></Key>
  <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
</EntityType>
<EntityType Name="Customer" BaseType="Shop.Entity">
  <Property Name="Name" Type="Edm.String" MaxLength="50"/>
  <NavigationProperty Name="Orders" Type="Collection(Shop.Order)" Partner="Customer"/>
</EntityType>
<EntityType Name="Order" BaseType="Shop.Entity">
  <Property Name="Total" Type="Edm.Decimal" Precision="10" Scale="2"/>
  <Property Name="Status" Type="Shop.Status" Nullable="false"/>
  <NavigationProperty Name="Customer" Type="Shop.Customer" Nullable="false" Partner="Orders"/>
</EntityType>
<Action Name="Ship" IsBound="true">
  <Parameter Name="order" Type="Shop.Order"/>
</Action>
<Term Name="Label" Type="Edm.String"/>
<EntityContainer Name="Default">
  <EntitySet Name="Customers" EntityType="Shop.Customer">
    <NavigationPropertyBinding Path="Orders" Target="Orders"/>
  </EntitySet>
  <EntitySet Name="Orders" EntityType="Shop.Order">
    <NavigationPropertyBinding Path="Customer" Target="Customers"/>
  </EntitySet>
</EntityContainer>
<Annotations Target="Shop.Customer/Name">
  <Annotation Term="Shop.Label" String="Full name"/>
</Annotations>"#;

pub static SHOP_XML: Lazy<String> = Lazy::new(|| edmx(&schema("Shop", SHOP_SCHEMA)));

/// The storefront read once and shared across tests.
pub static SHOP: Lazy<Model> = Lazy::new(|| edm::parse(&SHOP_XML).expect("storefront reads"));
