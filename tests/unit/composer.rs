//! Rendered migration sources for representative schema changes

use crate::helpers::project::snapshot;
use chrono::NaiveDate;
use insta::assert_snapshot;
use smooth_migrate::migrate::{MigrationGenerationInput, generate_migration};
use smooth_migrate::render::{MigrationAction, Stubs};
use smooth_migrate::schema::SchemaSnapshot;

fn generate(
    previous: Option<SchemaSnapshot>,
    current: SchemaSnapshot,
    batch: i64,
) -> smooth_migrate::migrate::MigrationGenerationResult {
    let mut input = MigrationGenerationInput::new(previous, current, batch);
    input.timestamp = NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(9, 30, 15)
        .unwrap();
    generate_migration(input, &Stubs::embedded()).unwrap()
}

#[test]
fn test_create_migration_source() {
    let current = snapshot(
        "posts",
        &[
            ("id", "increments"),
            ("title", "string:100"),
            ("user_id", "integer,on:users,onDelete:cascade"),
            ("timestamps", "timestamps"),
        ],
    );

    let result = generate(None, current, 1);

    assert_eq!(result.action, MigrationAction::Create);
    assert_eq!(result.class_name, "CreatePostsTable");
    assert_eq!(
        result.migration_filename,
        "2024_03_05_093015_create_posts_table.php"
    );
    assert_eq!(result.logs, vec!["Table posts created"]);
    assert!(!result.has_destructive);

    assert_snapshot!(result.migration_source.unwrap(), @r#"
<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

class CreatePostsTable extends Migration
{
    /**
     * Run the migrations.
     *
     * @return void
     */
    public function up()
    {
        Schema::create('posts', function (Blueprint $table) {
            $table->increments('id');
            $table->string('title', 100);
            $table->integer('user_id')->unsigned();
            $table->timestamps();
            $table->foreign('user_id')->references('id')->on('users')->onDelete('cascade');
        });
    }

    /**
     * Reverse the migrations.
     *
     * @return void
     */
    public function down()
    {
        Schema::dropIfExists('posts');
    }
}
"#);
}

#[test]
fn test_update_migration_source() {
    let previous = snapshot(
        "posts",
        &[
            ("id", "increments"),
            ("title", "string"),
            ("body", "text"),
            ("user_id", "integer"),
        ],
    );
    let current = snapshot(
        "posts",
        &[
            ("id", "increments"),
            ("title", "string:200"),
            ("user_id", "integer,on:users"),
            ("published_at", "timestamp,nullable"),
            ("timestamps", "timestamps"),
        ],
    );

    let result = generate(Some(previous), current, 2);

    assert_eq!(result.action, MigrationAction::Update);
    assert_eq!(result.class_name, "UpdatePostsTableBatch2");
    assert_eq!(
        result.migration_filename,
        "2024_03_05_093015_update_posts_table_batch2.php"
    );
    assert_eq!(
        result.logs,
        vec![
            "1 Column(s) Dropped",
            "2 Column(s) Added",
            "Column title definition changed from 'string' to 'string:200'",
            "Column user_id definition changed from 'integer' to 'integer,on:users'",
            "Foreign key added on user_id",
        ]
    );
    assert!(result.has_destructive);

    assert_snapshot!(result.migration_source.unwrap(), @r#"
<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

class UpdatePostsTableBatch2 extends Migration
{
    /**
     * Run the migrations.
     *
     * @return void
     */
    public function up()
    {
        Schema::table('posts', function (Blueprint $table) {
            $table->string('title', 200)->change();
            $table->integer('user_id')->unsigned()->change();
            $table->timestamp('published_at')->nullable();
            $table->timestamps();
            $table->foreign('user_id')->references('id')->on('users');
            $table->dropColumn('body');
        });
    }

    /**
     * Reverse the migrations.
     *
     * @return void
     */
    public function down()
    {
        Schema::table('posts', function (Blueprint $table) {
            $table->text('body');
            $table->dropForeign('posts_user_id_foreign');
            $table->dropColumn('published_at');
            $table->dropTimestamps();
            $table->string('title')->change();
            $table->integer('user_id')->change();
        });
    }
}
"#);
}

#[test]
fn test_table_rename_source() {
    let previous = snapshot("posts", &[("id", "increments"), ("title", "string")]);
    let current = snapshot("articles", &[("id", "increments"), ("headline", "string")]);

    let result = generate(Some(previous), current, 3);

    assert_eq!(
        result.logs,
        vec![
            "Table renamed from posts to articles",
            "Column renamed from title to headline",
        ]
    );

    assert_snapshot!(result.migration_source.unwrap(), @r#"
<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

class UpdateArticlesTableBatch3 extends Migration
{
    /**
     * Run the migrations.
     *
     * @return void
     */
    public function up()
    {
        Schema::rename('posts', 'articles');
        Schema::table('articles', function (Blueprint $table) {
            $table->renameColumn('title', 'headline');
        });
    }

    /**
     * Reverse the migrations.
     *
     * @return void
     */
    public function down()
    {
        Schema::table('articles', function (Blueprint $table) {
            $table->renameColumn('headline', 'title');
        });
        Schema::rename('articles', 'posts');
    }
}
"#);
}

#[test]
fn test_unchanged_schema_renders_nothing() {
    let current = snapshot("posts", &[("id", "increments"), ("title", "string")]);

    let result = generate(Some(current.clone()), current, 2);

    assert!(!result.has_changes);
    assert!(result.migration_source.is_none());
    assert!(result.logs.is_empty());
}

#[test]
fn test_foreign_key_redefinition() {
    let previous = snapshot("posts", &[("id", "increments"), ("user_id", "integer,on:users")]);
    let current = snapshot(
        "posts",
        &[("id", "increments"), ("user_id", "integer,on:users,onDelete:cascade")],
    );

    let result = generate(Some(previous), current, 2);
    let source = result.migration_source.unwrap();

    let drop = source
        .find("$table->dropForeign('posts_user_id_foreign');")
        .unwrap();
    let add = source
        .find("$table->foreign('user_id')->references('id')->on('users')->onDelete('cascade');")
        .unwrap();
    assert!(drop < add);
}
